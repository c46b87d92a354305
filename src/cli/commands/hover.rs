use anyhow::Result;
use tracing::trace;

use super::load_chart;
use crate::cli::ChartArgs;
use crate::config::{OutputFormat, Settings};
use crate::report::tooltip_text;

pub fn hover(args: &ChartArgs, index: usize, settings: &Settings) -> Result<String> {
    trace!("Entering hover command");
    let (chart, effective) = load_chart(args, settings)?;
    let tooltip = chart.tooltip(index);

    match effective.format {
        OutputFormat::Text => Ok(tooltip_text(&chart, index, tooltip.as_ref())),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&tooltip)?),
    }
}
