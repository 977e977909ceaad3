use sea_orm::DbErr;
use thiserror::Error;

/// Failure taxonomy shared by every service operation. Each variant carries
/// the human-readable message surfaced to the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed required fields.
    #[error("{0}")]
    InvalidInput(String),

    /// Session, record, student, or class does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Caller lacks the role or ownership the operation requires.
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate active session, duplicate record, or re-marking collision.
    #[error("{0}")]
    Conflict(String),

    /// Operation attempted against a session not in the required status.
    #[error("{0}")]
    InvalidState(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Folds a store-level uniqueness rejection into `Conflict`, leaving
    /// every other database failure untouched.
    pub(crate) fn from_insert(err: DbErr, conflict_message: &str) -> ServiceError {
        if is_unique_violation(&err) {
            ServiceError::Conflict(conflict_message.to_owned())
        } else {
            ServiceError::Database(err)
        }
    }
}

/// True when the error is SQLite reporting a unique-constraint violation.
/// The store indexes are the last line of defence for the one-record-per-
/// student and one-active-session-per-class invariants; races that slip
/// past the application checks land here.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Query(_) | DbErr::Exec(_) => {
            let msg = err.to_string();
            msg.contains("UNIQUE constraint failed") || msg.contains("1555") || msg.contains("2067")
        }
        _ => false,
    }
}
