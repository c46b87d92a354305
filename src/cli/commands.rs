pub mod explain;
pub mod hover;
pub mod render;

pub use explain::explain;
pub use hover::hover;
pub use render::render;

use anyhow::{Context, Result};
use compute::ForecastChart;
use tracing::{debug, info};

use super::{ChartArgs, Effective};
use crate::config::Settings;
use crate::loader::load_payload;

/// Loads the document named by `args` and derives its chart.
pub(crate) fn load_chart(args: &ChartArgs, settings: &Settings) -> Result<(ForecastChart, Effective)> {
    let effective = args.effective(settings);
    debug!("Effective options: {:?}", effective);

    let mut payload = load_payload(&args.input)
        .with_context(|| format!("Failed to load forecast document {}", args.input.display()))?;
    if let Some(time_unit) = effective.time_unit {
        payload.time_unit = time_unit;
    }

    let chart = ForecastChart::from_payload(&payload, effective.alignment)
        .context("Failed to build forecast chart")?;
    info!(
        "Chart ready: {} points, state {:?}",
        chart.timeline().len(),
        chart.state()
    );
    Ok((chart, effective))
}
