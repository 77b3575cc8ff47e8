//! Error types for vecprobe-search

use thiserror::Error;
use vecprobe_core::CoreError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to initialize vector search: {0}")]
    Initialization(#[source] CoreError),

    #[error("Error in similarity search ({operation}): {source}")]
    Search {
        operation: String,
        #[source]
        source: CoreError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    pub(crate) fn search(operation: impl Into<String>, source: CoreError) -> Self {
        SearchError::Search {
            operation: operation.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
