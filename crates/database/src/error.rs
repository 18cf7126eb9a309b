use crate::report::Side;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("The database rejected the operation: {0}")]
    DataAccessError(#[source] sqlx::Error),

    #[error("No {entity} with id '{id}' exists.")]
    NotFound { entity: &'static str, id: String },

    #[error("Procedure {0} did not return a generated id.")]
    MissingId(&'static str),

    #[error("Procedure {0} returned no result set.")]
    MissingResultSet(&'static str),

    #[error("Column '{column}' has type {type_name}, which cannot be read into a table cell.")]
    UnsupportedColumn { column: String, type_name: String },
}

impl DbError {
    /// The handle could not be established or was lost.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionConfigError(_) | Self::ConnectionError(_))
    }

    /// The statement reached the database (or came back) and was unusable.
    pub fn is_data_access(&self) -> bool {
        !self.is_connection()
    }
}

/// Splits driver errors into the two classes callers act on.
impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::ConnectionError(error),
            sqlx::Error::Database(db_err) if is_connection_state(db_err.code().as_deref()) => {
                Self::ConnectionError(sqlx::Error::Database(db_err))
            }
            other => Self::DataAccessError(other),
        }
    }
}

/// SQLSTATE class 08 (connection exception) and 57P0x (operator intervention
/// that ends the session).
fn is_connection_state(code: Option<&str>) -> bool {
    code.is_some_and(|code| code.starts_with("08") || code.starts_with("57P0"))
}

/// Problems deriving the final score from the two box scores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("The {side} box score has no '{column}' column.")]
    MissingColumn { side: Side, column: &'static str },

    #[error("The {0} box score has no 'Total' row.")]
    MissingTotal(Side),

    #[error("The {side} box score has {count} 'Total' rows; expected exactly one.")]
    DuplicateTotal { side: Side, count: usize },

    #[error("The {side} 'Total' row holds a non-numeric points value: '{value}'.")]
    NotNumeric { side: Side, value: String },
}
