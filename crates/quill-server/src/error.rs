use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("seed error: {0}")]
    Seed(#[from] quill_core::StoreError),

    #[error("no free port after {attempts} attempts starting at {start}")]
    NoFreePort { start: SocketAddr, attempts: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
