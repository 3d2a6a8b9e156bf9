use thiserror::Error;

/// Failures raised by the scoring core.
///
/// Division by zero inside a metric is not an error: those cases return an
/// IEEE sentinel (`NaN` or `inf`) instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// A [`crate::member::Member`] invariant was violated.
    #[error("{0}")]
    Validation(String),

    /// Malformed or structurally invalid tabular input. Always fails the whole batch.
    #[error("{0}")]
    Format(String),

    /// A metric was requested for a position outside the group.
    #[error("member index {index} is out of bounds for a group of {len}")]
    Index { index: usize, len: usize },
}

pub type MetricResult<T> = Result<T, MetricError>;
