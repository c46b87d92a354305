use chrono::{DateTime, Utc};
use common::{ExplanationSet, ForecastPayload, Kpi, TimeUnit};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::bounds::BoundSynthesizer;
use crate::error::Result;
use crate::explanation::{ExplanationLayout, ExplanationView};
use crate::selection::{ExplanationAlignment, SelectionMapper};
use crate::timeline::{ForecastSeries, Timeline, TimelineMerger};
use crate::tooltip::{SeriesLabels, Tooltip, TooltipAggregator};

/// Shown instead of the chart when there is nothing to plot.
pub const EMPTY_MESSAGE: &str = "No data available. Please select options and click \"Generate Chart\".";
/// Explanation panel prompt while no point is selected.
pub const SELECT_PROMPT: &str = "Click on a predicted point to see the explanation.";
pub const HOVER_PROMPT: &str = "Hover to see the forecasted values, bounds and confidence.";
/// Label of the reference marker at the forecast origin.
pub const TODAY_LABEL: &str = "Today";

/// Everything the chart derives its state from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInput {
    pub series: ForecastSeries,
    pub kpi: Option<Kpi>,
    pub time_unit: TimeUnit,
    pub explanations: Vec<ExplanationSet>,
}

impl ChartInput {
    pub fn from_payload(payload: &ForecastPayload) -> Result<Self> {
        Ok(Self {
            series: ForecastSeries::from_payload(payload)?,
            kpi: payload.kpi.clone(),
            time_unit: payload.time_unit,
            explanations: payload.explanation_data.clone(),
        })
    }
}

/// What the chart shows as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "selection", rename_all = "snake_case")]
pub enum ChartState {
    /// No points: the fallback message replaces the chart.
    Empty,
    /// Chart drawn, explanation panel prompts for a click.
    NoSelection,
    /// Chart drawn with the explanation set at this index.
    Selected(usize),
}

/// Reference marker drawn at the last historical point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayMarker {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub label: &'static str,
}

/// Forecast chart model: derived timeline, explanations and the click selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    timeline: Timeline,
    fingerprint: u64,
    explanations: Vec<ExplanationSet>,
    kpi: Option<Kpi>,
    time_unit: TimeUnit,
    mapper: SelectionMapper,
    selection: Option<usize>,
}

fn derive_timeline(series: &ForecastSeries) -> Timeline {
    let mut timeline = TimelineMerger::merge_series(series);
    BoundSynthesizer.synthesize(&mut timeline);
    timeline
}

impl ForecastChart {
    #[instrument(skip(input), fields(series = %input.series.series_key, explanations = input.explanations.len()))]
    pub fn new(input: ChartInput, alignment: ExplanationAlignment) -> Self {
        let timeline = derive_timeline(&input.series);
        debug!(
            "Chart derived: {} points, breakpoint {}, {} explanation sets for {} predictions",
            timeline.len(),
            timeline.breakpoint(),
            input.explanations.len(),
            input.series.future.len()
        );

        Self {
            fingerprint: input.series.fingerprint(),
            timeline,
            explanations: input.explanations,
            kpi: input.kpi,
            time_unit: input.time_unit,
            mapper: SelectionMapper::new(alignment),
            selection: None,
        }
    }

    pub fn from_payload(payload: &ForecastPayload, alignment: ExplanationAlignment) -> Result<Self> {
        Ok(Self::new(ChartInput::from_payload(payload)?, alignment))
    }

    /// Replaces the chart input. Returns `true` when the timeline was re-derived.
    ///
    /// Any change of input resets the selection. The merge and bound
    /// derivation only re-run when the series content changed.
    pub fn update(&mut self, input: ChartInput) -> bool {
        let fingerprint = input.series.fingerprint();
        let series_changed = fingerprint != self.fingerprint;
        let changed = series_changed
            || input.explanations != self.explanations
            || input.kpi != self.kpi
            || input.time_unit != self.time_unit;

        if series_changed {
            self.timeline = derive_timeline(&input.series);
            self.fingerprint = fingerprint;
        }
        self.explanations = input.explanations;
        self.kpi = input.kpi;
        self.time_unit = input.time_unit;

        if changed {
            debug!("Chart input changed, clearing selection");
            self.selection = None;
        }
        series_changed
    }

    /// Handles a click on the timeline point at `global_index`.
    pub fn click(&mut self, global_index: usize) -> Option<usize> {
        if self.timeline.is_empty() {
            return None;
        }
        self.selection = if global_index < self.timeline.len() {
            self.mapper
                .on_click(global_index, self.timeline.breakpoint(), self.explanations.len())
        } else {
            None
        };
        info!("Point {} clicked, explanation {:?}", global_index, self.selection);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn state(&self) -> ChartState {
        if self.timeline.is_empty() {
            return ChartState::Empty;
        }
        match self.selection {
            Some(index) => ChartState::Selected(index),
            None => ChartState::NoSelection,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn explanations(&self) -> &[ExplanationSet] {
        &self.explanations
    }

    pub fn kpi(&self) -> Option<&Kpi> {
        self.kpi.as_ref()
    }

    /// Value unit suffix, empty without KPI metadata.
    pub fn unit(&self) -> &str {
        self.kpi.as_ref().map(|kpi| kpi.unit.as_str()).unwrap_or("")
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn alignment(&self) -> ExplanationAlignment {
        self.mapper.alignment()
    }

    pub fn labels(&self) -> SeriesLabels {
        SeriesLabels::for_series(self.timeline.series_key())
    }

    /// Formatted timestamp labels of every timeline point.
    pub fn axis_labels(&self) -> Vec<String> {
        self.timeline
            .points()
            .iter()
            .map(|point| self.time_unit.format(&point.timestamp))
            .collect()
    }

    pub fn today_marker(&self) -> Option<TodayMarker> {
        let index = self.timeline.today_index()?;
        let point = self.timeline.get(index)?;
        Some(TodayMarker {
            index,
            timestamp: point.timestamp,
            label: TODAY_LABEL,
        })
    }

    pub fn selected_explanation(&self) -> Option<&ExplanationSet> {
        self.selection.and_then(|index| self.explanations.get(index))
    }

    pub fn explanation_layout(&self) -> Option<ExplanationLayout> {
        self.selected_explanation()
            .map(|entries| ExplanationView::layout(entries))
    }

    /// Heading of the explanation panel for the selected point.
    pub fn explanation_title(&self) -> Option<String> {
        let selected = self.selection?;
        let index = self.mapper.timeline_index(selected, self.timeline.breakpoint())?;
        let point = self.timeline.get(index)?;
        Some(format!(
            "Explanation of prediction for date: {}",
            self.time_unit.format(&point.timestamp)
        ))
    }

    /// Hover summary for the point at `global_index`.
    pub fn tooltip(&self, global_index: usize) -> Option<Tooltip> {
        let point = self.timeline.get(global_index)?;
        TooltipAggregator::new(self.kpi.as_ref(), self.time_unit).summarize(point, &self.labels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::{ExplanationEntry, SeriesPoint};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn payload() -> ForecastPayload {
        ForecastPayload {
            past_data: vec![
                SeriesPoint::new(ts(1), "v", 10.0),
                SeriesPoint::new(ts(2), "v", 12.0),
            ],
            future_data: vec![
                SeriesPoint::new(ts(3), "v", 14.0).with_confidence(91.0),
                SeriesPoint::new(ts(4), "v", 16.0).with_confidence(88.0),
            ],
            kpi: Some(Kpi::with_unit("kWh")),
            explanation_data: vec![
                vec![ExplanationEntry::new("temp", 5.0), ExplanationEntry::new("load", -8.0)],
                vec![ExplanationEntry::new("hour", 1.5)],
            ],
            ..Default::default()
        }
    }

    fn chart() -> ForecastChart {
        ForecastChart::from_payload(&payload(), ExplanationAlignment::default()).unwrap()
    }

    #[test]
    fn test_loaded_chart_starts_without_selection() {
        let chart = chart();
        assert_eq!(chart.state(), ChartState::NoSelection);
        assert_eq!(chart.timeline().breakpoint(), 1);
        assert_eq!(chart.unit(), "kWh");
        assert_eq!(chart.labels().main, "v");
    }

    #[test]
    fn test_click_selects_second_explanation() {
        let mut chart = chart();

        assert_eq!(chart.click(2), Some(1));
        assert_eq!(chart.state(), ChartState::Selected(1));
        assert_eq!(chart.selected_explanation().unwrap()[0].feature, "hour");
        assert_eq!(
            chart.explanation_title().as_deref(),
            Some("Explanation of prediction for date: 2024-01-03")
        );
    }

    #[test]
    fn test_click_on_today_selects_index_zero() {
        let mut chart = chart();

        assert_eq!(chart.click(1), Some(0));
        assert_eq!(chart.state(), ChartState::Selected(0));
        let layout = chart.explanation_layout().unwrap();
        assert_eq!(layout.scale, 8.0);
    }

    #[test]
    fn test_click_out_of_range_clears_selection() {
        let mut chart = chart();
        chart.click(2);

        assert_eq!(chart.click(0), None);
        assert_eq!(chart.state(), ChartState::NoSelection);
        chart.click(2);
        assert_eq!(chart.click(3), None);
        assert_eq!(chart.click(42), None);
        assert!(chart.explanation_layout().is_none());
        assert!(chart.explanation_title().is_none());
    }

    #[test]
    fn test_empty_chart_ignores_clicks() {
        let mut chart =
            ForecastChart::from_payload(&ForecastPayload::default(), ExplanationAlignment::default()).unwrap();

        assert_eq!(chart.state(), ChartState::Empty);
        assert_eq!(chart.click(0), None);
        assert_eq!(chart.state(), ChartState::Empty);
        assert!(chart.today_marker().is_none());
        assert!(chart.tooltip(0).is_none());
    }

    #[test]
    fn test_today_marker_at_breakpoint() {
        let marker = chart().today_marker().unwrap();
        assert_eq!(marker.index, 1);
        assert_eq!(marker.timestamp, ts(2));
        assert_eq!(marker.label, "Today");
    }

    #[test]
    fn test_no_today_marker_without_history() {
        let mut payload = payload();
        payload.past_data.clear();
        let chart = ForecastChart::from_payload(&payload, ExplanationAlignment::default()).unwrap();

        assert!(chart.today_marker().is_none());
        assert_eq!(chart.timeline().breakpoint(), -1);
    }

    #[test]
    fn test_data_change_resets_selection() {
        let mut chart = chart();
        chart.click(2);

        let mut next = payload();
        next.future_data[1] = SeriesPoint::new(ts(4), "v", 20.0);
        let rederived = chart.update(ChartInput::from_payload(&next).unwrap());

        assert!(rederived);
        assert_eq!(chart.state(), ChartState::NoSelection);
        assert_eq!(chart.timeline().points()[3].upper_bound, Some(20.0 * 1.2));
    }

    #[test]
    fn test_unchanged_input_keeps_selection_and_timeline() {
        let mut chart = chart();
        chart.click(2);
        let before = chart.timeline().clone();

        let rederived = chart.update(ChartInput::from_payload(&payload()).unwrap());

        assert!(!rederived);
        assert_eq!(chart.selection(), Some(1));
        assert_eq!(chart.timeline(), &before);
    }

    #[test]
    fn test_kpi_change_resets_selection_without_rederiving() {
        let mut chart = chart();
        chart.click(2);

        let mut next = payload();
        next.kpi = None;
        let rederived = chart.update(ChartInput::from_payload(&next).unwrap());

        assert!(!rederived);
        assert_eq!(chart.selection(), None);
        assert_eq!(chart.unit(), "");
    }

    #[test]
    fn test_tooltip_for_predicted_point() {
        let tooltip = chart().tooltip(2).unwrap();

        assert_eq!(tooltip.lines.len(), 3);
        assert_eq!(tooltip.lines[0].text, "v: 14.00 kWh");
        assert_eq!(tooltip.confidence.as_deref(), Some("Confidence: 91.00%"));
    }

    #[test]
    fn test_first_prediction_alignment_shifts_selection() {
        let mut chart =
            ForecastChart::from_payload(&payload(), ExplanationAlignment::FirstPrediction).unwrap();

        assert_eq!(chart.click(1), None);
        assert_eq!(chart.click(2), Some(0));
        assert_eq!(
            chart.explanation_title().as_deref(),
            Some("Explanation of prediction for date: 2024-01-03")
        );
    }

    #[test]
    fn test_axis_labels_follow_time_unit() {
        let mut payload = payload();
        payload.time_unit = TimeUnit::Month;
        let chart = ForecastChart::from_payload(&payload, ExplanationAlignment::default()).unwrap();

        assert_eq!(chart.axis_labels(), vec!["2024-01"; 4]);
    }
}
