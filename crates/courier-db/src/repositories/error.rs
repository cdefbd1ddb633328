//! Database error mapping helpers

use courier_core::DomainError;

/// Map a SQLx error to a domain database error
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Database(err.to_string())
}

/// Map a SQLx error, turning a unique-constraint violation into the
/// domain conflict chosen by `on_conflict`
pub(crate) fn map_unique_violation(
    err: sqlx::Error,
    on_conflict: impl FnOnce(&str) -> DomainError,
) -> DomainError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            return on_conflict(&constraint);
        }
    }
    map_db_error(err)
}
