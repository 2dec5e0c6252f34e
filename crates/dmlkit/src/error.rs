//! Error types for dmlkit

use crate::validate::StatementKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for dmlkit operations
pub type DbResult<T> = Result<T, QueryError>;

/// Boxed driver error kept as the source of connection/execution failures.
pub type DriverError = Arc<dyn std::error::Error + Send + Sync>;

/// Stable numeric error codes.
///
/// The numbers are part of the public contract: callers branch on them,
/// so existing values never change meaning. 2, 4 and 5 are retired (null
/// table, null values, null rows) and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Failure with no finer classification (driver errors, close failures).
    Unclassified,
    /// The database server could not be reached.
    ServerUnreachable,
    /// The server rejected the user name or password.
    BadCredentials,
    /// A column name is blank.
    BlankColumn,
    /// The table name is empty.
    MissingTable,
    /// No columns were given.
    MissingColumns,
    /// No values or rows were given.
    MissingValues,
    /// The SQL text is empty.
    EmptyQuery,
    /// The SQL text does not match the statement kind.
    InvalidQuery,
    /// A result set has no columns (or a table has no rows).
    EmptyResult,
    /// A result set is ragged or a column lacks its header.
    MalformedResult,
    /// A connection string could not be parsed.
    InvalidConnectionString,
    /// A row carries more values than there are columns.
    RowTooWide,
}

impl ErrorCode {
    /// The stable integer value of this code.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unclassified => -1,
            Self::ServerUnreachable => 0,
            Self::BadCredentials => 1,
            Self::BlankColumn => 3,
            Self::MissingTable => 6,
            Self::MissingColumns => 7,
            Self::MissingValues => 8,
            Self::EmptyQuery => 9,
            Self::InvalidQuery => 10,
            Self::EmptyResult => 11,
            Self::MalformedResult => 12,
            Self::InvalidConnectionString => 13,
            Self::RowTooWide => 14,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Error taxonomy for building, validating and executing statements.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// A required builder argument is missing or empty
    #[error("Argument error {code}: {message}")]
    Argument { code: ErrorCode, message: String },

    /// The SQL text does not have the shape of the declared statement kind
    #[error("Invalid {kind} query ({code}): {message}")]
    Shape {
        kind: StatementKind,
        code: ErrorCode,
        message: String,
    },

    /// Opening or closing the connection failed
    #[error("Connection error {code}: {message}")]
    Connection {
        code: ErrorCode,
        message: String,
        native_code: Option<String>,
        #[source]
        source: Option<DriverError>,
    },

    /// The driver failed while running a statement
    #[error("Execution error: {message}")]
    Execution {
        message: String,
        native_code: Option<String>,
        #[source]
        source: Option<DriverError>,
    },

    /// A result set does not have a rectangular shape
    #[error("Transpose error {code}: {message}")]
    Transpose { code: ErrorCode, message: String },
}

impl QueryError {
    /// Create an argument error
    pub fn argument(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Argument {
            code,
            message: message.into(),
        }
    }

    /// Create a shape (validation) error
    pub fn shape(kind: StatementKind, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Shape {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Create a connection error without a driver source
    pub fn connection(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Connection {
            code,
            message: message.into(),
            native_code: None,
            source: None,
        }
    }

    /// Create an execution error without a driver source
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            native_code: None,
            source: None,
        }
    }

    /// Create a transpose error
    pub fn transpose(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Transpose {
            code,
            message: message.into(),
        }
    }

    /// Attach a native (driver) error code.
    pub fn with_native_code(mut self, native: impl Into<String>) -> Self {
        match &mut self {
            Self::Connection { native_code, .. } | Self::Execution { native_code, .. } => {
                *native_code = Some(native.into());
            }
            _ => {}
        }
        self
    }

    /// Attach the underlying driver error.
    pub fn with_source(mut self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            Self::Connection { source, .. } | Self::Execution { source, .. } => {
                *source = Some(Arc::new(err));
            }
            _ => {}
        }
        self
    }

    /// The stable error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Argument { code, .. }
            | Self::Shape { code, .. }
            | Self::Connection { code, .. }
            | Self::Transpose { code, .. } => *code,
            Self::Execution { .. } => ErrorCode::Unclassified,
        }
    }

    /// The stable error code as an integer.
    pub fn code(&self) -> i32 {
        self.error_code().as_i32()
    }

    /// The native driver code (a SQLSTATE for PostgreSQL), if known.
    pub fn native_code(&self) -> Option<&str> {
        match self {
            Self::Connection { native_code, .. } | Self::Execution { native_code, .. } => {
                native_code.as_deref()
            }
            _ => None,
        }
    }

    /// The human-readable message, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Argument { message, .. }
            | Self::Shape { message, .. }
            | Self::Connection { message, .. }
            | Self::Execution { message, .. }
            | Self::Transpose { message, .. } => message,
        }
    }

    /// Check if this is an argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument { .. })
    }

    /// Check if this is a shape (validation) error
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }

    /// Check if this is a transpose error
    pub fn is_transpose(&self) -> bool {
        matches!(self, Self::Transpose { .. })
    }

    /// Classify a `tokio_postgres` error raised while connecting.
    ///
    /// - no server response: [`ErrorCode::ServerUnreachable`], SQLSTATE `08001`
    /// - `28P01` / `28000`: [`ErrorCode::BadCredentials`]
    /// - anything else: [`ErrorCode::Unclassified`] with the server's SQLSTATE
    pub fn from_connect_error(err: tokio_postgres::Error) -> Self {
        use tokio_postgres::error::SqlState;

        let classified = match err.as_db_error() {
            None => Self::connection(
                ErrorCode::ServerUnreachable,
                "Cannot connect to server. Check the connection settings.",
            )
            .with_native_code(SqlState::SQLCLIENT_UNABLE_TO_ESTABLISH_SQLCONNECTION.code()),
            Some(db_err) => {
                let state = db_err.code();
                let code = if *state == SqlState::INVALID_PASSWORD
                    || *state == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
                {
                    ErrorCode::BadCredentials
                } else {
                    ErrorCode::Unclassified
                };
                let message = match code {
                    ErrorCode::BadCredentials => {
                        "Invalid username/password, please try again.".to_string()
                    }
                    _ => db_err.message().to_string(),
                };
                Self::connection(code, message).with_native_code(state.code())
            }
        };
        classified.with_source(err)
    }

    /// Wrap a `tokio_postgres` error raised while running a statement.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let (message, native) = match err.as_db_error() {
            Some(db_err) => (
                db_err.message().to_string(),
                Some(db_err.code().code().to_string()),
            ),
            None => (err.to_string(), None),
        };
        let wrapped = Self::execution(message);
        let wrapped = match native {
            Some(code) => wrapped.with_native_code(code),
            None => wrapped,
        };
        wrapped.with_source(err)
    }
}
