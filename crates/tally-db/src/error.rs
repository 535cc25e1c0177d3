//! # Store Errors
//!
//! ```text
//! sqlx::Error ──classify──► DbError ──► ApiError (tally-server) ──► alert()
//!                              │
//!                              ├── NotFound ............ 404
//!                              ├── UniqueViolation ..... 400
//!                              └── everything else ..... 500, generic text
//! ```

use thiserror::Error;

/// Everything the store layer can fail with.
#[derive(Debug, Error)]
pub enum DbError {
    /// An unknown sale id, or a sale line naming a product that is not in
    /// the catalog.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate barcode).
    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: String, value: String },

    /// A line pointed at a missing sale or product row.
    #[error("Broken reference: {message}")]
    ForeignKeyViolation { message: String },

    /// Database file could not be opened or created.
    #[error("Could not open store: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// Runtime SQL error.
    #[error("SQL error: {0}")]
    QueryFailed(String),

    /// Begin or commit of a transaction failed.
    #[error("Transaction error: {0}")]
    TransactionFailed(String),

    /// All pooled connections are in use.
    #[error("No free store connection")]
    PoolExhausted,

    #[error("Store error: {0}")]
    Internal(String),
}

impl DbError {
    /// `Sale not found: 42`
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether this error means "no such row".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// SQLite reports constraint failures only through the message text, so
/// database errors are classified by prefix.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let text = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if let Some(column) = text.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(column, "unknown")
                } else if text.starts_with("FOREIGN KEY") {
                    DbError::ForeignKeyViolation {
                        message: text.to_owned(),
                    }
                } else {
                    DbError::QueryFailed(text.to_owned())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_owned()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Sale", 42);
        assert_eq!(err.to_string(), "Sale not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_row_is_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
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
}
