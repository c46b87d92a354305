use common::{Kpi, TimeUnit};
use serde::Serialize;

use crate::timeline::MergedPoint;

/// Legend names of the three rendered series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLabels {
    pub main: String,
    pub upper: String,
    pub lower: String,
}

impl SeriesLabels {
    pub fn for_series(series_key: &str) -> Self {
        Self {
            main: series_key.to_string(),
            upper: "Upper Bound".to_string(),
            lower: "Lower Bound".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipLine {
    pub label: String,
    pub value: f64,
    pub text: String,
}

/// Hover summary of one timeline position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<TooltipLine>,
    pub confidence: Option<String>,
}

impl Tooltip {
    /// Plain-text block: title, one line per series, then the confidence line.
    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        for line in &self.lines {
            out.push('\n');
            out.push_str(&line.text);
        }
        if let Some(confidence) = &self.confidence {
            out.push('\n');
            out.push_str(confidence);
        }
        out
    }
}

/// Composes the hover summary shared by all series at one position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipAggregator {
    unit: String,
    time_unit: TimeUnit,
}

impl TooltipAggregator {
    pub fn new(kpi: Option<&Kpi>, time_unit: TimeUnit) -> Self {
        Self {
            unit: kpi.map(|kpi| kpi.unit.clone()).unwrap_or_default(),
            time_unit,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn format_value(&self, label: &str, value: f64) -> String {
        if self.unit.is_empty() {
            format!("{}: {:.2}", label, value)
        } else {
            format!("{}: {:.2} {}", label, value, self.unit)
        }
    }

    /// `None` when the point has nothing to show.
    pub fn summarize(&self, point: &MergedPoint, labels: &SeriesLabels) -> Option<Tooltip> {
        let lines: Vec<TooltipLine> = [
            (&labels.main, Some(point.value)),
            (&labels.upper, point.upper_bound),
            (&labels.lower, point.lower_bound),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.filter(|v| v.is_finite())?;
            Some(TooltipLine {
                label: label.clone(),
                value,
                text: self.format_value(label, value),
            })
        })
        .collect();

        if lines.is_empty() {
            return None;
        }

        Some(Tooltip {
            title: self.time_unit.format(&point.timestamp),
            confidence: point
                .confidence
                .filter(|c| c.is_finite())
                .map(|c| format!("Confidence: {:.2}%", c)),
            lines,
        })
    }
}
