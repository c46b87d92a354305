use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::explanation::ExplanationSet;
use crate::time_unit::TimeUnit;

/// Keys of a wire point that never name a series.
pub const RESERVED_KEYS: [&str; 2] = ["timestamp", "confidence"];

/// One observation of the tracked series, either historical or predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TimePoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Wire shape of a point as produced by the data collaborator.
///
/// The series value lives under a dynamic key next to the reserved
/// `timestamp` and `confidence` fields, e.g.
/// `{"timestamp": "...", "machine_1": 12.5, "confidence": 87.0}`.
/// Keys stay in document order; values that are not numbers are kept but
/// never charted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl SeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, series_key: impl Into<String>, value: f64) -> Self {
        let mut values = Map::new();
        values.insert(series_key.into(), Value::from(value));
        Self {
            timestamp,
            confidence: None,
            values,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Value stored under `series_key`, if any.
    pub fn value(&self, series_key: &str) -> Option<f64> {
        self.values.get(series_key).and_then(Value::as_f64)
    }

    /// Numeric series keys carried by this point in document order, reserved keys excluded.
    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(key, value)| value.is_number() && !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, _)| key.as_str())
    }

    /// Keys whose value is not a number and therefore never names a series.
    pub fn ignored_keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_number())
            .map(|(key, _)| key.as_str())
    }

    /// Converts to a typed point for the given series.
    pub fn to_time_point(&self, series_key: &str) -> Option<TimePoint> {
        self.value(series_key).map(|value| TimePoint {
            timestamp: self.timestamp,
            value,
            confidence: self.confidence,
        })
    }
}

/// Optional KPI metadata attached to a chart. Only the unit is rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: String,
}

impl Kpi {
    pub fn with_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..Default::default()
        }
    }
}

/// Complete input of one forecast chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastPayload {
    /// Explicit series key. Discovered from the first point when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_key: Option<String>,
    /// Historical observations, oldest first.
    #[serde(default)]
    pub past_data: Vec<SeriesPoint>,
    /// Predicted observations, oldest first.
    #[serde(default)]
    pub future_data: Vec<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi: Option<Kpi>,
    #[serde(default)]
    pub time_unit: TimeUnit,
    /// One explanation set per predicted point.
    #[serde(default)]
    pub explanation_data: Vec<ExplanationSet>,
}

impl ForecastPayload {
    pub fn is_empty(&self) -> bool {
        self.past_data.is_empty() && self.future_data.is_empty()
    }

    /// Unit suffix for values, empty when no KPI is attached.
    pub fn unit(&self) -> &str {
        self.kpi.as_ref().map(|kpi| kpi.unit.as_str()).unwrap_or("")
    }
}
