//! # Database Errors
//!
//! ```text
//!  sqlx::Error ──► DbError ──► StoreError (dashboard) ──► ApiError (frontend)
//! ```
//!
//! Constraint failures are split out by kind because the dashboard treats
//! them differently from an unreachable database: a line pointing at a
//! missing item is bad input, a closed pool is worth retrying.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id. Deleting an already deleted sale ends here.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// `target` is SQLite's `table.column`, e.g. `items.name`.
    #[error("Duplicate value for {target}")]
    UniqueViolation { target: String },

    /// A sale line whose sale or item does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A quantity below 1 slipped past validation.
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Stored data that breaks a domain rule, or an unexpected driver error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        target: unique_target(&message),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// `UNIQUE constraint failed: items.name` → `items.name`
fn unique_target(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, target)| target.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_unique_target() {
        assert_eq!(unique_target("UNIQUE constraint failed: items.name"), "items.name");
        assert_eq!(unique_target("constraint failed"), "unknown");
    }

    #[test]
    fn test_messages() {
        assert_eq!(DbError::not_found("Sale", "abc").to_string(), "Sale not found: abc");
        let err = DbError::UniqueViolation {
            target: "items.name".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate value for items.name");
    }
}
