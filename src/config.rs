use anyhow::{Context, Result};
use clap::ValueEnum;
use common::TimeUnit;
use compute::ExplanationAlignment;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// CLI settings layered from defaults, a settings file and FORECHART_* variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Label unit overriding the one carried by documents
    #[serde(default)]
    pub time_unit: Option<TimeUnit>,
    /// Explanation-to-timeline alignment
    #[serde(default)]
    pub alignment: ExplanationAlignment,
    /// Width in characters of the explanation bar area
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_bar_width() -> usize {
    40
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_unit: None,
            alignment: ExplanationAlignment::default(),
            bar_width: default_bar_width(),
            format: OutputFormat::default(),
        }
    }
}

/// Load settings from `path`, or from `forechart.*` in the working directory when present.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name("forechart").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix("FORECHART").try_parsing(true))
        .build()
        .context("Failed to load settings")?
        .try_deserialize::<Settings>()
        .context("Invalid settings")?;

    tracing::debug!("Settings loaded: {:?}", settings);
    Ok(settings)
}
