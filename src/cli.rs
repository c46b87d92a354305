use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use common::TimeUnit;
use compute::ExplanationAlignment;
use std::path::PathBuf;
use tracing::debug;

pub mod commands;

use crate::config::{OutputFormat, Settings, load_settings};
use commands::{explain, hover, render};

#[derive(Parser)]
#[command(name = "forechart")]
#[command(about = "Forecast chart renderer with per-point explanations")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML, YAML or JSON)
    ///
    /// Defaults to `forechart.toml` in the working directory when present.
    /// Every setting can also be given as a FORECHART_* environment variable.
    #[arg(short, long, global = true, env = "FORECHART_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that loads a forecast document.
#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    /// Forecast document with past_data, future_data and explanation_data
    ///
    /// Files ending in .yaml or .yml are read as YAML, anything else as JSON.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Timestamp label unit, overrides the document and settings
    ///
    /// One of: minute, hour, day, week, month, year
    #[arg(short, long)]
    pub time_unit: Option<TimeUnit>,

    /// Which point explanation set 0 belongs to
    ///
    /// breakpoint: the "Today" point (default)
    /// first_prediction: the first point after "Today"
    #[arg(short, long)]
    pub alignment: Option<ExplanationAlignment>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the merged timeline with bounds and the "Today" marker
    Render {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Click a timeline point and show its explanation
    Explain {
        #[command(flatten)]
        chart: ChartArgs,

        /// Global timeline index of the clicked point
        #[arg(short = 'n', long)]
        index: usize,
    },
    /// Show the hover tooltip of a timeline point
    Hover {
        #[command(flatten)]
        chart: ChartArgs,

        /// Global timeline index of the hovered point
        #[arg(short = 'n', long)]
        index: usize,
    },
}

impl Cli {
    pub fn run(self) -> Result<String> {
        let settings = load_settings(self.config.as_deref())?;
        debug!("Effective settings: {:?}", settings);

        match self.command {
            Commands::Render { chart } => render(&chart, &settings),
            Commands::Explain { chart, index } => explain(&chart, index, &settings),
            Commands::Hover { chart, index } => hover(&chart, index, &settings),
        }
    }
}

/// Settings after applying command line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Effective {
    pub time_unit: Option<TimeUnit>,
    pub alignment: ExplanationAlignment,
    pub format: OutputFormat,
    pub bar_width: usize,
}

impl ChartArgs {
    pub fn effective(&self, settings: &Settings) -> Effective {
        Effective {
            time_unit: self.time_unit.or(settings.time_unit),
            alignment: self.alignment.unwrap_or(settings.alignment),
            format: self.format.unwrap_or(settings.format),
            bar_width: settings.bar_width,
        }
    }
}
