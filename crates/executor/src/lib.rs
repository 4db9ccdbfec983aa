use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

pub mod drivers;

pub use drivers::mysql::MySqlDatabase;

/// One result row: column name to scalar JSON value, in SELECT order.
pub type Row = Map<String, Value>;

#[derive(Debug)]
pub enum QueryError {
    /// The driver rejected or failed the statement.
    Driver(sqlx::Error),
    /// No session was ever established; carries the startup failure.
    Disconnected(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Driver(e) => write!(f, "{}", e),
            QueryError::Disconnected(reason) => {
                write!(f, "database connection is not available: {}", reason)
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Driver(e) => Some(e),
            QueryError::Disconnected(_) => None,
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(e: sqlx::Error) -> Self {
        QueryError::Driver(e)
    }
}

/// The database session shared by every request.
///
/// Implementations must be safe to call concurrently; serializing statements
/// over the underlying connection is their job, callers never lock.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    async fn fetch_all(&self, sql: &str) -> Result<Vec<Row>, QueryError>;
}

/// Stand-in used when the startup connection attempt failed. Every query
/// fails with the startup error.
#[derive(Debug, Clone)]
pub struct DisconnectedDatabase {
    reason: String,
}

impl DisconnectedDatabase {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Database for DisconnectedDatabase {
    async fn fetch_all(&self, _sql: &str) -> Result<Vec<Row>, QueryError> {
        Err(QueryError::Disconnected(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnected_database_always_fails() {
        let db = DisconnectedDatabase::new("Access denied for user 'root'@'localhost'");
        for _ in 0..2 {
            let err = db.fetch_all("SELECT 1").await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "database connection is not available: Access denied for user 'root'@'localhost'"
            );
        }
    }

    #[test]
    fn driver_errors_display_the_driver_message() {
        let err = QueryError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), sqlx::Error::RowNotFound.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }
}
