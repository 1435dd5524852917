use thiserror::Error;

use crate::dto::advancement::AdvancementType;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Advancement error: {0}")]
    Advancement(#[from] AdvancementError),

    #[error("Round already completed")]
    RoundAlreadyCompleted,

    #[error("No results recorded for this round")]
    NoResults,

    #[error("{failed} of {total} advancement status writes failed")]
    PartialWrite { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by the advancement decision layer, either because a round
/// configuration is incomplete or because a stored advancement field cannot
/// be parsed into its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvancementError {
    #[error("{advancement_type} advancement requires {field}")]
    MissingCutoff {
        advancement_type: AdvancementType,
        field: &'static str,
    },

    #[error("Unknown advancement type: {0}")]
    UnknownAdvancementType(String),

    #[error("Unknown advancement status: {0}")]
    UnknownAdvancementStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_write_reports_counts() {
        let error = StorageError::PartialWrite {
            failed: 3,
            total: 10,
        };
        assert_eq!(
            error.to_string(),
            "3 of 10 advancement status writes failed"
        );
    }

    #[test]
    fn test_missing_cutoff_names_type_and_field() {
        let error = AdvancementError::MissingCutoff {
            advancement_type: AdvancementType::Percentage,
            field: "cutoff_percentage",
        };
        assert_eq!(
            error.to_string(),
            "percentage advancement requires cutoff_percentage"
        );
    }
}
