// crates/core/src/result.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContavozError {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type ContavozResult<T> = Result<T, ContavozError>;
