//! Classification of Diesel failures shared by every repository.
//!
//! Repositories translate a [`DbFailure`] into their own port error, which
//! keeps constraint-name matching in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Database failure reduced to what the ports care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// A unique or primary-key constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: Option<String> },
    /// The connection dropped mid-query.
    Connection(&'static str),
    /// Anything else, including `NotFound` from `first`/`get_result`.
    Query(&'static str),
}

impl DbFailure {
    /// Stable diagnostic for logs and port error messages.
    pub(crate) fn message(&self) -> &'static str {
        match self {
            Self::UniqueViolation { .. } => "unique constraint violated",
            Self::ForeignKeyViolation { .. } => "foreign key constraint violated",
            Self::Connection(message) | Self::Query(message) => message,
        }
    }
}

/// Reduce a Diesel error to a [`DbFailure`], logging the raw detail at debug.
pub(crate) fn classify(error: DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    DbFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    DbFailure::Connection("database connection error")
                }
                _ => DbFailure::Query("database error"),
            }
        }
        DieselError::NotFound => DbFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error"),
        other => {
            debug!(error = %other, "diesel operation failed");
            DbFailure::Query("database error")
        }
    }
}
