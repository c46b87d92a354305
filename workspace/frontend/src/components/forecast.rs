pub mod chart;
pub mod explanation;
pub mod figure;
pub mod stats;
pub mod tooltip;
pub mod view;

pub use chart::ForecastChart;
pub use view::Forecast;
