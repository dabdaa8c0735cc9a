// ============================================================================
// Error Types
// Failures surfaced to the host application
// ============================================================================

use thiserror::Error;

use super::ids::ChartId;
use crate::numeric::NumericError;

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{field}' is required")]
    MissingField { field: &'static str },

    #[error("field '{field}' cannot be blank")]
    BlankField { field: &'static str },

    #[error("field '{field}' is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        ValidationError::MissingField { field }
    }

    pub fn blank(field: &'static str) -> Self {
        ValidationError::BlankField { field }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Malformed {
            field,
            reason: reason.into(),
        }
    }

    /// Wrap a decimal conversion failure for `field`.
    pub fn numeric(field: &'static str, err: NumericError) -> Self {
        Self::malformed(field, err.to_string())
    }
}

/// Failure reported by a [`ChartStore`](crate::interfaces::ChartStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("chart store unavailable: {0}")]
    Unavailable(String),

    #[error("storage constraint violated: {0}")]
    Constraint(String),
}

/// Top-level error of the quality-control service.
///
/// Missing chart limits are not an error: rule evaluation reports no
/// violation and Cpk reports zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QcError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("chart {0} is inactive")]
    InactiveChart(ChartId),
}

impl QcError {
    pub fn chart_not_found(id: ChartId) -> Self {
        QcError::NotFound {
            entity: "control chart",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QcError::NotFound { .. })
    }
}

/// Result type alias for service operations
pub type QcResult<T> = Result<T, QcError>;
