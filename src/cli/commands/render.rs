use anyhow::Result;
use tracing::trace;

use super::load_chart;
use crate::cli::ChartArgs;
use crate::config::{OutputFormat, Settings};
use crate::report::{ChartReport, timeline_table};

pub fn render(args: &ChartArgs, settings: &Settings) -> Result<String> {
    trace!("Entering render command");
    let (chart, effective) = load_chart(args, settings)?;

    match effective.format {
        OutputFormat::Text => Ok(timeline_table(&chart)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ChartReport::new(&chart))?),
    }
}
