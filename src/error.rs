use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while loading a table or rendering a chart.
///
/// None of these are retried: the input is a one-shot batch file, so the
/// first failure aborts the current load or render.
#[derive(Debug, Error)]
pub enum Error {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected {expected} fields but found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{token}' is not a number")]
    Parse {
        line: usize,
        column: String,
        token: String,
    },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid column schema: {0}")]
    InvalidSchema(String),

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("invalid plot recipe: {0}")]
    Recipe(#[from] serde_json::Error),

    #[error("chart request contains no series")]
    EmptyRequest,

    #[error("series '{label}': x has {x} values but y has {y}")]
    LengthMismatch { label: String, x: usize, y: usize },

    #[error("series '{label}': divisor {divisor} must be finite and non-zero")]
    InvalidDivisor { label: String, divisor: f64 },

    #[error("series '{label}', point {index}: {value} cannot be shown on a logarithmic axis")]
    NonPositiveValue {
        label: String,
        index: usize,
        value: f64,
    },

    #[error("series '{label}', point {index}: value is not finite")]
    NonFiniteValue { label: String, index: usize },

    #[error("unsupported image format: .{0}")]
    UnsupportedFormat(String),

    #[error("plotting failed: {0}")]
    Plot(String),
}
