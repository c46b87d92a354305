pub mod bounds;
pub mod chart;
pub mod error;
pub mod explanation;
pub mod selection;
pub mod timeline;
pub mod tooltip;

use common::ForecastPayload;

pub use bounds::BoundSynthesizer;
pub use chart::{ChartInput, ChartState, ForecastChart, TodayMarker};
pub use error::{ChartError, Result};
pub use explanation::{AxisDomain, ExplanationBar, ExplanationLayout, ExplanationView};
pub use selection::{ExplanationAlignment, SelectionMapper};
pub use timeline::{ForecastSeries, MergedPoint, Timeline, TimelineMerger};
pub use tooltip::{SeriesLabels, Tooltip, TooltipAggregator};

/// Returns a chart built with the default configuration used most of the time.
///
/// Explanation set 0 is aligned with the forecast origin, the same convention
/// the dashboard has always used for its click handling.
pub fn default_chart(payload: &ForecastPayload) -> Result<ForecastChart> {
    ForecastChart::from_payload(payload, ExplanationAlignment::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{ExplanationEntry, SeriesPoint};

    fn scenario_payload() -> ForecastPayload {
        let ts = |day| Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        ForecastPayload {
            past_data: vec![SeriesPoint::new(ts(1), "v", 10.0), SeriesPoint::new(ts(2), "v", 12.0)],
            future_data: vec![SeriesPoint::new(ts(3), "v", 14.0), SeriesPoint::new(ts(4), "v", 16.0)],
            explanation_data: vec![
                vec![ExplanationEntry::new("temp", 5.0), ExplanationEntry::new("load", -8.0)],
                vec![ExplanationEntry::new("temp", 2.0)],
            ],
            ..Default::default()
        }
    }

    /// Walks the whole interaction: derive, click a prediction, inspect the explanation.
    #[test]
    fn test_default_chart_scenario() {
        let mut chart = default_chart(&scenario_payload()).expect("Failed to build chart");

        assert_eq!(chart.timeline().breakpoint(), 1);
        let point = &chart.timeline().points()[2];
        assert!((point.upper_bound.unwrap() - 16.8).abs() < 1e-9);
        assert!((point.lower_bound.unwrap() - 11.2).abs() < 1e-9);

        assert_eq!(chart.click(2), Some(1));
        let layout = chart.explanation_layout().expect("Explanation should be shown");
        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.scale, 2.0);
    }

    /// Re-deriving unchanged input gives a structurally identical timeline.
    #[test]
    fn test_default_chart_is_deterministic() {
        let first = default_chart(&scenario_payload()).unwrap();
        let second = default_chart(&scenario_payload()).unwrap();
        assert_eq!(first.timeline(), second.timeline());
    }

    #[test]
    fn test_default_chart_empty_payload() {
        let chart = default_chart(&ForecastPayload::default()).unwrap();
        assert_eq!(chart.state(), ChartState::Empty);
    }
}
