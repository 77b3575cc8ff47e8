//! Index types - query requests, stats and provisioning parameters

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Embedding, Metadata};

/// A single nearest-neighbor query against one partition of the index
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// The query vector
    pub vector: Embedding,

    /// Maximum number of matches to return
    pub top_k: usize,

    /// Whether stored metadata should be returned with each match
    pub include_metadata: bool,

    /// Namespace to search; `None` searches the default partition
    pub namespace: Option<String>,
}

impl QueryRequest {
    pub fn new(vector: Embedding, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            include_metadata: true,
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Per-namespace statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub vector_count: u64,
}

/// Index-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Vector dimension of the index
    pub dimension: usize,

    /// Fraction of capacity used (0-1)
    pub index_fullness: f32,

    /// Number of vectors across all namespaces
    pub total_vector_count: u64,

    /// Vector counts keyed by namespace name (the default partition is `""`)
    pub namespaces: BTreeMap<String, NamespaceStats>,
}

/// A vector returned by an ID lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedVector {
    pub id: String,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Similarity metric used by an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
    #[serde(rename = "dotproduct")]
    DotProduct,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => write!(f, "cosine"),
            Metric::Euclidean => write!(f, "euclidean"),
            Metric::DotProduct => write!(f, "dotproduct"),
        }
    }
}

/// Parameters for creating a serverless index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Index name
    pub name: String,

    /// Vector dimension; must match the embedding model's output length
    pub dimension: usize,

    /// Similarity metric
    pub metric: Metric,

    /// Cloud provider hosting the index
    pub cloud: String,

    /// Region within the cloud provider
    pub region: String,
}

impl IndexSpec {
    pub const DEFAULT_CLOUD: &'static str = "aws";
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a cosine index spec in the default serverless region
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric: Metric::Cosine,
            cloud: Self::DEFAULT_CLOUD.to_string(),
            region: Self::DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_region(mut self, cloud: impl Into<String>, region: impl Into<String>) -> Self {
        self.cloud = cloud.into();
        self.region = region.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_spec_defaults() {
        let spec = IndexSpec::new("docs", 1536);
        assert_eq!(spec.metric, Metric::Cosine);
        assert_eq!(spec.cloud, "aws");
        assert_eq!(spec.region, "us-east-1");
    }

    #[test]
    fn test_metric_wire_names() {
        assert_eq!(serde_json::to_string(&Metric::Cosine).unwrap(), "\"cosine\"");
        assert_eq!(serde_json::to_string(&Metric::DotProduct).unwrap(), "\"dotproduct\"");
        assert_eq!(Metric::Euclidean.to_string(), "euclidean");
    }
}
