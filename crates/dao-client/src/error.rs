//! Client error types.

use dao_sql::ValidationError;
use dao_types::TypeError;
use thiserror::Error;

/// Boxed error returned by a driver collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while preparing, executing or reading a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Declared parameters do not match the command text, or their input
    /// arrays disagree in size. Raised before any driver call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Error raised by the driver while executing a call.
    #[error(transparent)]
    Driver(BoxError),

    /// Error raised while consuming a row or a set of returned parameters.
    #[error("error reading {position}: {source}")]
    RowRead {
        /// Where the failure happened, e.g. `row 3` or `row 0; 2 of 4 calls`.
        position: String,
        /// Parameter snapshot at the time of the failure.
        parameters: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// A value could not be converted to the requested type.
    #[error(transparent)]
    Conversion(#[from] TypeError),

    /// No column has the requested name.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A key was produced twice while building a dictionary.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A parameter name is not a valid identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The deferred connection could not be opened.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Error raised by caller-supplied code.
    #[error("{0}")]
    Callback(String),
}

impl Error {
    /// Wrap a driver error.
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Self::Driver(err.into())
    }

    /// Wrap an error raised while reading at `position`.
    pub fn row_read(position: impl Into<String>, parameters: impl Into<String>, source: Error) -> Self {
        Self::RowRead {
            position: position.into(),
            parameters: parameters.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is a parameter validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The innermost error, looking through [`Error::RowRead`] wrappers.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Self::RowRead { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
