use common::TimeUnit;
use compute::chart::{EMPTY_MESSAGE, HOVER_PROMPT, SELECT_PROMPT};
use compute::{
    ChartState, ExplanationAlignment, ExplanationLayout, ForecastChart, MergedPoint, SeriesLabels,
    TodayMarker, Tooltip,
};
use serde::Serialize;

fn cell(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Table of every timeline point with its bounds and the "Today" marker.
pub fn timeline_table(chart: &ForecastChart) -> String {
    if chart.state() == ChartState::Empty {
        return EMPTY_MESSAGE.to_string();
    }

    let labels = chart.labels();
    let today = chart.today_marker();
    let unit = chart.unit();
    let mut lines = Vec::with_capacity(chart.timeline().len() + 4);

    let title = if unit.is_empty() {
        labels.main.clone()
    } else {
        format!("{} ({})", labels.main, unit)
    };
    lines.push(title);
    lines.push(format!(
        "{:>4}  {:<16}  {:>12}  {:>12}  {:>12}  {:>10}",
        "#", "timestamp", labels.main, labels.upper, labels.lower, "confidence"
    ));

    for (index, (point, label)) in chart
        .timeline()
        .points()
        .iter()
        .zip(chart.axis_labels())
        .enumerate()
    {
        let marker = match &today {
            Some(marker) if marker.index == index => format!("  <- {}", marker.label),
            _ => String::new(),
        };
        lines.push(format!(
            "{:>4}  {:<16}  {:>12}  {:>12}  {:>12}  {:>10}{}",
            index,
            label,
            cell(Some(point.value)),
            cell(point.upper_bound),
            cell(point.lower_bound),
            cell(point.confidence),
            marker
        ));
    }

    lines.push(String::new());
    lines.push(SELECT_PROMPT.to_string());
    lines.push(HOVER_PROMPT.to_string());
    lines.join("\n")
}

/// Horizontal bars drawn around a zero reference line.
pub fn explanation_bars(layout: &ExplanationLayout, width: usize) -> String {
    let half = (width / 2).max(1);
    let feature_width = layout
        .bars
        .iter()
        .map(|bar| bar.feature.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "importance axis [{:.2}, {:.2}]",
        layout.domain.min, layout.domain.max
    )];

    for bar in &layout.bars {
        let filled = ((bar.ratio.abs() * half as f64).round() as usize).min(half);
        let (left, right) = if bar.ratio < 0.0 {
            (
                format!("{}{}", " ".repeat(half - filled), "#".repeat(filled)),
                " ".repeat(half),
            )
        } else {
            (
                " ".repeat(half),
                format!("{}{}", "#".repeat(filled), " ".repeat(half - filled)),
            )
        };
        lines.push(format!(
            "{:<fw$}  {}|{}  {:+.2}",
            bar.feature,
            left,
            right,
            bar.importance,
            fw = feature_width
        ));
    }

    if !layout.skipped.is_empty() {
        lines.push(format!("skipped (not a number): {}", layout.skipped.join(", ")));
    }
    lines.join("\n")
}

/// Explanation panel as text: the selected set, the prompt, or the empty message.
pub fn explanation_panel(chart: &ForecastChart, width: usize) -> String {
    match chart.state() {
        ChartState::Empty => EMPTY_MESSAGE.to_string(),
        ChartState::NoSelection => format!("{}\n{}", SELECT_PROMPT, HOVER_PROMPT),
        ChartState::Selected(_) => {
            let title = chart.explanation_title().unwrap_or_default();
            match chart.explanation_layout() {
                Some(layout) => format!("{}\n{}", title, explanation_bars(&layout, width)),
                None => SELECT_PROMPT.to_string(),
            }
        }
    }
}

/// Machine-readable snapshot of the chart model.
#[derive(Debug, Serialize)]
pub struct ChartReport<'a> {
    pub state: ChartState,
    pub series_key: &'a str,
    pub unit: &'a str,
    pub time_unit: TimeUnit,
    pub alignment: ExplanationAlignment,
    pub breakpoint: isize,
    pub today: Option<TodayMarker>,
    pub labels: SeriesLabels,
    pub points: &'a [MergedPoint],
    pub explanation_title: Option<String>,
    pub explanation: Option<ExplanationLayout>,
}

impl<'a> ChartReport<'a> {
    pub fn new(chart: &'a ForecastChart) -> Self {
        Self {
            state: chart.state(),
            series_key: chart.timeline().series_key(),
            unit: chart.unit(),
            time_unit: chart.time_unit(),
            alignment: chart.alignment(),
            breakpoint: chart.timeline().breakpoint(),
            today: chart.today_marker(),
            labels: chart.labels(),
            points: chart.timeline().points(),
            explanation_title: chart.explanation_title(),
            explanation: chart.explanation_layout(),
        }
    }
}

/// Hover report: the tooltip block, or a notice when there is nothing at `index`.
pub fn tooltip_text(chart: &ForecastChart, index: usize, tooltip: Option<&Tooltip>) -> String {
    match (chart.state(), tooltip) {
        (ChartState::Empty, _) => EMPTY_MESSAGE.to_string(),
        (_, Some(tooltip)) => tooltip.to_text(),
        (_, None) => format!("No data at index {}", index),
    }
}
