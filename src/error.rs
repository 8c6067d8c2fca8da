use thiserror::Error;

/// Unified error for the aggregation and layout core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A table row whose cell count disagrees with the header.
    #[error("row {row} has {actual} cells, expected {expected}")]
    InputShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid thresholds or page geometry, rejected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
