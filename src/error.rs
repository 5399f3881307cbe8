//! Error types for the SQL gateway.
//!
//! Failures are classified into the four kinds an operation can hit:
//! opening the connection, running the catalog scan, running a caller
//! statement, and encoding the result. Display is the bare underlying
//! message so the public operations can pass the driver text through
//! verbatim; SQLSTATE codes are kept on the variant for logging.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{message}")]
    Connection { message: String },

    #[error("{message}")]
    Catalog {
        message: String,
        sql_state: Option<String>,
    },

    #[error("{message}")]
    Query {
        message: String,
        /// e.g., "42601" for a syntax error
        sql_state: Option<String>,
    },

    #[error("{message}")]
    Encoding { message: String },

    /// Server-side failure outside any operation (bind, protocol loop).
    #[error("{message}")]
    Transport { message: String },
}

impl GatewayError {
    /// Wrap a connection-open failure.
    pub fn connection(err: sqlx::Error) -> Self {
        Self::Connection {
            message: driver_message(&err),
        }
    }

    /// Create a connection error from a plain message.
    pub fn connection_message(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Wrap a failure during the catalog scan.
    pub fn catalog(err: sqlx::Error) -> Self {
        Self::Catalog {
            message: driver_message(&err),
            sql_state: sql_state(&err),
        }
    }

    /// Wrap a failure while executing a caller-supplied statement.
    pub fn query(err: sqlx::Error) -> Self {
        Self::Query {
            message: driver_message(&err),
            sql_state: sql_state(&err),
        }
    }

    /// Create an encoding error. Not expected to occur given the
    /// type-mapping contract, but the path exists rather than panicking.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a transport error from a plain message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// The SQLSTATE code, when the database reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Catalog { sql_state, .. } | Self::Query { sql_state, .. } => {
                sql_state.as_deref()
            }
            _ => None,
        }
    }
}

/// Extract the database's own message where one exists, falling back to
/// the sqlx rendering for transport-level failures.
fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

fn sql_state(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.to_string()),
        _ => None,
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
