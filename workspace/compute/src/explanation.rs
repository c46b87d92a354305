use common::ExplanationEntry;
use serde::Serialize;
use tracing::{instrument, warn};

/// Importance-axis range of the explanation chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    /// Symmetric domain around zero with the display padding applied.
    pub fn symmetric(scale: f64) -> Self {
        let half = scale * ExplanationView::PADDING;
        Self { min: -half, max: half }
    }

    /// A zero-width domain; every bar renders flat.
    pub fn is_flat(&self) -> bool {
        self.max - self.min <= 0.0
    }

    /// Signed share of the half-axis covered by `value`, in `[-1, 1]`.
    pub fn ratio(&self, value: f64) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (value / self.max).clamp(-1.0, 1.0)
    }
}

/// One horizontal bar of the explanation chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationBar {
    pub feature: String,
    pub importance: f64,
    pub ratio: f64,
}

/// Bars, scale and axis of one explanation set, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationLayout {
    pub bars: Vec<ExplanationBar>,
    pub scale: f64,
    pub domain: AxisDomain,
    /// Importance of the reference line separating positive and negative bars.
    pub reference: f64,
    /// Features dropped because their importance was not a finite number.
    pub skipped: Vec<String>,
}

impl ExplanationLayout {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Lays out a ranked explanation set on a symmetric importance axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplanationView;

impl ExplanationView {
    /// Padding factor applied on each side of the largest magnitude.
    pub const PADDING: f64 = 1.1;

    /// Largest absolute importance, `0` for an empty set.
    pub fn scale(entries: &[ExplanationEntry]) -> f64 {
        entries
            .iter()
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.importance.abs())
            .fold(0.0, f64::max)
    }

    #[instrument(skip_all, fields(entries = entries.len()))]
    pub fn layout(entries: &[ExplanationEntry]) -> ExplanationLayout {
        let mut kept: Vec<ExplanationEntry> = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            if !entry.is_valid() {
                warn!("Skipping explanation bar '{}': importance is not a number", entry.feature);
                skipped.push(entry.feature.clone());
                continue;
            }
            match kept.iter_mut().find(|existing| existing.feature == entry.feature) {
                Some(existing) => {
                    warn!(
                        "Duplicate explanation feature '{}', keeping the last importance",
                        entry.feature
                    );
                    existing.importance = entry.importance;
                }
                None => kept.push(entry.clone()),
            }
        }

        let scale = Self::scale(&kept);
        let domain = AxisDomain::symmetric(scale);
        let bars = kept
            .into_iter()
            .map(|entry| ExplanationBar {
                ratio: domain.ratio(entry.importance),
                feature: entry.feature,
                importance: entry.importance,
            })
            .collect();

        ExplanationLayout {
            bars,
            scale,
            domain,
            reference: 0.0,
            skipped,
        }
    }
}
