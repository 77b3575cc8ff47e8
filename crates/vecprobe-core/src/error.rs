//! Error types for vecprobe-core

use thiserror::Error;

/// Failure reported by an external collaborator (embedding provider or vector index)
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Invalid embedding dimension: expected {expected}, got {got}")]
    InvalidDimension { expected: usize, got: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
