//! Error types for vecprobe-client

use thiserror::Error;
use vecprobe_core::CoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid embedding dimension: expected {expected}, got {got}")]
    InvalidDimension { expected: usize, got: usize },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Connection(e.to_string())
        }
    }
}

impl ClientError {
    /// Convert into a core error raised by the embedding provider
    pub fn into_embedding_error(self) -> CoreError {
        match self {
            ClientError::InvalidDimension { expected, got } => {
                CoreError::InvalidDimension { expected, got }
            }
            other => CoreError::Embedding(other.to_string()),
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotFound(name) => CoreError::IndexNotFound(name),
            ClientError::InvalidDimension { expected, got } => {
                CoreError::InvalidDimension { expected, got }
            }
            other => CoreError::Index(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
