//! Error types for the content store.

use thiserror::Error;

/// Failure code carried on the failure track of every store operation.
///
/// Each variant maps onto exactly one numeric status that the transport layer
/// renders verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ErrorCode {
    /// Malformed or missing input, or an identity collision.
    #[error("bad request")]
    BadRequest,

    /// A referenced author does not exist.
    #[error("unknown author")]
    Unauthorized,

    /// The entity or index was not found.
    #[error("not found")]
    NotFound,

    /// The comments of an already resolved post could not be read.
    #[error("internal error")]
    Internal,
}

impl ErrorCode {
    /// Numeric status code for this failure.
    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

/// Errors raised while loading or preparing site data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The seed document is not valid site data.
    #[error("invalid site data: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error while reading a seed file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for store setup.
pub type Result<T> = std::result::Result<T, StoreError>;
