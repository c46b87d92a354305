use anyhow::Result;
use tracing::{info, trace};

use super::load_chart;
use crate::cli::ChartArgs;
use crate::config::{OutputFormat, Settings};
use crate::report::{ChartReport, explanation_panel};

pub fn explain(args: &ChartArgs, index: usize, settings: &Settings) -> Result<String> {
    trace!("Entering explain command");
    let (mut chart, effective) = load_chart(args, settings)?;

    let selected = chart.click(index);
    info!("Click on point {} selected explanation {:?}", index, selected);

    match effective.format {
        OutputFormat::Text => Ok(explanation_panel(&chart, effective.bar_width)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ChartReport::new(&chart))?),
    }
}
