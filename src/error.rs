//! Error taxonomy for simulation and optimization.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `InvalidConfig` | Config validation, before any sampling |
//! | `DimensionMismatch` | Ragged, non-square, empty or non-finite matrices |
//! | `NumericOverflow` | Growth function or coefficient application |
//! | `InfeasibleAssignment` | Solver/heuristic output that is not a bijection |
//! | `DeadlineExceeded` | Batch jobs running past their deadline |
//! | `WorkerPool` | Thread pool construction |

use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationError;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, YieldError>;

/// Errors produced by the simulation and optimization core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum YieldError {
    #[error("invalid config: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("infeasible assignment: {0}")]
    InfeasibleAssignment(String),

    #[error("deadline of {deadline:?} exceeded after {completed} of {total} units")]
    DeadlineExceeded {
        deadline: Duration,
        completed: usize,
        total: usize,
    },

    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl YieldError {
    /// Stable snake_case category, used on the payload boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            YieldError::InvalidConfig(_) => "invalid_config",
            YieldError::DimensionMismatch(_) => "dimension_mismatch",
            YieldError::NumericOverflow(_) => "numeric_overflow",
            YieldError::InfeasibleAssignment(_) => "infeasible_assignment",
            YieldError::DeadlineExceeded { .. } => "deadline_exceeded",
            YieldError::WorkerPool(_) => "worker_pool",
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_config_message_joins_all_problems() {
        let err = YieldError::InvalidConfig(vec![
            ValidationError::new(ValidationErrorKind::OutOfRange, "n must be at least 1"),
            ValidationError::new(ValidationErrorKind::OutOfRange, "delta_k must be at least 1"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid config: n must be at least 1; delta_k must be at least 1"
        );
        assert_eq!(err.kind(), "invalid_config");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            YieldError::DimensionMismatch("x".into()).kind(),
            "dimension_mismatch"
        );
        assert_eq!(YieldError::NumericOverflow("x".into()).kind(), "numeric_overflow");
        assert_eq!(
            YieldError::DeadlineExceeded {
                deadline: Duration::from_millis(5),
                completed: 1,
                total: 2
            }
            .kind(),
            "deadline_exceeded"
        );
    }
}
