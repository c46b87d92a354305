use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Contribution of one feature to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    pub feature: String,
    /// Signed importance. Values the wire cannot express as a number
    /// deserialize as NaN so a single bad entry does not reject the document.
    #[serde(default = "missing_importance", deserialize_with = "lenient_importance")]
    pub importance: f64,
}

impl ExplanationEntry {
    pub fn new(feature: impl Into<String>, importance: f64) -> Self {
        Self {
            feature: feature.into(),
            importance,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.importance.is_finite()
    }
}

/// Ranked feature contributions justifying one predicted point.
pub type ExplanationSet = Vec<ExplanationEntry>;

fn missing_importance() -> f64 {
    f64::NAN
}

fn lenient_importance<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawImportance {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawImportance::deserialize(deserializer)? {
        RawImportance::Number(value) => value,
        RawImportance::Text(text) => text.trim().parse().unwrap_or_else(|_| {
            warn!("Non-numeric importance '{}' in explanation entry", text);
            f64::NAN
        }),
        RawImportance::Other(_) => {
            warn!("Importance of explanation entry is not a number");
            f64::NAN
        }
    })
}
