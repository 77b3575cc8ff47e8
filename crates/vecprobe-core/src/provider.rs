//! Collaborator traits - the embedding provider and the vector index

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{FetchedVector, IndexSpec, IndexStats, Match, QueryRequest, Result};

/// A fixed-dimension embedding vector
pub type Embedding = Vec<f32>;

/// Converts text into embedding vectors
///
/// Both calling conventions produce identical output. The blocking variant
/// must not be called from an async worker thread.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a query string
    async fn embed_query(&self, text: &str) -> Result<Embedding>;

    /// Embed a query string, blocking the current thread
    fn embed_query_blocking(&self, text: &str) -> Result<Embedding>;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;
}

/// Read access to a connected vector index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest-neighbor query; matches come back in the index's relevance order
    async fn query(&self, request: QueryRequest) -> Result<Vec<Match>>;

    /// Index-wide statistics
    async fn describe_stats(&self) -> Result<IndexStats>;

    /// Look up vectors by ID
    async fn fetch(
        &self,
        ids: &[String],
        namespace: Option<&str>,
    ) -> Result<HashMap<String, FetchedVector>>;
}

/// Control-plane access: connecting to and creating indexes
#[async_trait]
pub trait IndexControl: Send + Sync {
    type Index: VectorIndex + 'static;

    /// Connect to an existing index
    ///
    /// Fails with `CoreError::IndexNotFound` when no index of that name exists.
    async fn connect(&self, name: &str) -> Result<Self::Index>;

    /// Create a new index
    async fn create_index(&self, spec: &IndexSpec) -> Result<()>;
}
