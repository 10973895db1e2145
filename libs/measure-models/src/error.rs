//! Error types for declaration records

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid type identity: {0}")]
    InvalidIdentity(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
