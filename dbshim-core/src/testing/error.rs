use crate::error::Error;

/// Failures raised by the in-memory driver.
///
/// They reach callers as [`Error::Driver`] and can be recovered with
/// [`Error::downcast_driver_error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MemoryError {
    #[error("connection string is empty")]
    NoConnectionString,

    #[error("connection is already open")]
    AlreadyOpen,

    #[error("connection is not open")]
    NotOpen,

    #[error("command has no connection")]
    NoConnection,

    #[error("no column found for name: {0}")]
    ColumnNotFound(String),

    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    #[error("cursor is not positioned on a row")]
    NoCurrentRow,

    #[error("cursor is closed")]
    CursorClosed,

    #[error("no parameter found for name: {0}")]
    ParameterNotFound(String),

    #[error("parameter index out of bounds: the len is {len}, but the index is {index}")]
    ParameterIndexOutOfBounds { index: usize, len: usize },

    #[error("transaction has already been committed or rolled back")]
    TransactionCompleted,

    /// A scripted failure; see [`MemoryResult::Fail`](super::MemoryResult::Fail).
    #[error("{0}")]
    Script(String),
}

impl From<MemoryError> for Error {
    fn from(error: MemoryError) -> Self {
        Error::driver(error)
    }
}
