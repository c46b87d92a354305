use common::ForecastPayload;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while reading a forecast document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization of a forecast document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

pub fn parse_payload(text: &str, format: DocumentFormat) -> Result<ForecastPayload, DocumentError> {
    let payload = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(payload)
}

#[instrument]
pub fn load_payload(path: &Path) -> Result<ForecastPayload, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let payload = parse_payload(&text, DocumentFormat::from_path(path))?;
    debug!(
        "Loaded {} past points, {} future points, {} explanation sets",
        payload.past_data.len(),
        payload.future_data.len(),
        payload.explanation_data.len()
    );
    Ok(payload)
}
