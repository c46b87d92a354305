use thiserror::Error;

/// Error types for the chart computation module
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The first timeline entry carries no value besides the reserved keys
    #[error("Series key not found: first point at {timestamp} has no value field")]
    SeriesKeyNotFound {
        /// Timestamp of the point that was inspected
        timestamp: String,
    },

    /// A point does not carry a value for the resolved series key
    #[error("Missing series value: point {index} has no value for series '{key}'")]
    MissingSeriesValue {
        /// Timeline index of the offending point
        index: usize,
        /// Resolved series key
        key: String,
    },

    /// The explicit series key names a reserved field
    #[error("Invalid series key: '{0}' is reserved")]
    ReservedSeriesKey(String),
}

/// Type alias for Result with ChartError
pub type Result<T> = std::result::Result<T, ChartError>;
