//! Error types for buildmatrix.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unresolved gem: {0}")]
    UnresolvedGem(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("registration failed: {0}")]
    Registration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
