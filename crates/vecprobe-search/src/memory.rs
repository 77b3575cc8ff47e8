//! In-memory vector index
//!
//! Implements the same control and data-plane traits as the hosted index, so
//! search, provisioning and diagnostics can run without network access.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use vecprobe_core::{
    CoreError, Embedding, FetchedVector, IndexControl, IndexSpec, IndexStats, Match, Metadata,
    Metric, NamespaceStats, QueryRequest, VectorIndex,
};

#[derive(Debug, Clone)]
struct StoredVector {
    id: String,
    values: Embedding,
    metadata: Metadata,
}

#[derive(Debug)]
struct IndexData {
    dimension: usize,
    metric: Metric,
    /// Vectors per namespace; the default partition is `""`
    namespaces: BTreeMap<String, Vec<StoredVector>>,
}

impl IndexData {
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            Metric::Cosine => cosine_similarity(a, b),
            Metric::DotProduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            // Negated squared distance so that higher still means closer
            Metric::Euclidean => -a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>(),
        }
    }
}

/// Control plane over a set of in-memory indexes
#[derive(Debug, Clone, Default)]
pub struct MemoryControl {
    indexes: Arc<RwLock<HashMap<String, Arc<RwLock<IndexData>>>>>,
}

impl MemoryControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all existing indexes
    pub async fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indexes.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl IndexControl for MemoryControl {
    type Index = MemoryIndex;

    async fn connect(&self, name: &str) -> vecprobe_core::Result<MemoryIndex> {
        let indexes = self.indexes.read().await;
        let data = indexes
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::IndexNotFound(name.to_string()))?;
        Ok(MemoryIndex { data })
    }

    async fn create_index(&self, spec: &IndexSpec) -> vecprobe_core::Result<()> {
        let mut indexes = self.indexes.write().await;
        if indexes.contains_key(&spec.name) {
            return Err(CoreError::Index(format!("index {} already exists", spec.name)));
        }

        debug!("Creating in-memory index {} ({} dims, {})", spec.name, spec.dimension, spec.metric);
        indexes.insert(
            spec.name.clone(),
            Arc::new(RwLock::new(IndexData {
                dimension: spec.dimension,
                metric: spec.metric,
                namespaces: BTreeMap::new(),
            })),
        );
        Ok(())
    }
}

/// A connection to one in-memory index
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    data: Arc<RwLock<IndexData>>,
}

impl MemoryIndex {
    /// Create a standalone index that is not registered with any control plane
    pub fn new(dimension: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(IndexData {
                dimension,
                metric: Metric::Cosine,
                namespaces: BTreeMap::new(),
            })),
        }
    }

    /// Insert or replace a vector
    pub async fn upsert(
        &self,
        namespace: Option<&str>,
        id: impl Into<String>,
        values: Embedding,
        metadata: Metadata,
    ) -> vecprobe_core::Result<()> {
        let mut data = self.data.write().await;
        if values.len() != data.dimension {
            return Err(CoreError::InvalidDimension {
                expected: data.dimension,
                got: values.len(),
            });
        }

        let id = id.into();
        let vectors = data
            .namespaces
            .entry(namespace.unwrap_or_default().to_string())
            .or_default();
        let vector = StoredVector { id, values, metadata };
        match vectors.iter_mut().find(|v| v.id == vector.id) {
            Some(existing) => *existing = vector,
            None => vectors.push(vector),
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, request: QueryRequest) -> vecprobe_core::Result<Vec<Match>> {
        let data = self.data.read().await;
        if request.vector.len() != data.dimension {
            return Err(CoreError::InvalidDimension {
                expected: data.dimension,
                got: request.vector.len(),
            });
        }

        let namespace = request.namespace.unwrap_or_default();
        let Some(vectors) = data.namespaces.get(&namespace) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<Match> = vectors
            .iter()
            .map(|v| {
                let metadata = if request.include_metadata {
                    v.metadata.clone()
                } else {
                    Metadata::new()
                };
                Match::new(v.id.clone(), data.score(&request.vector, &v.values), metadata)
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(request.top_k);
        Ok(matches)
    }

    async fn describe_stats(&self) -> vecprobe_core::Result<IndexStats> {
        let data = self.data.read().await;
        let namespaces: BTreeMap<String, NamespaceStats> = data
            .namespaces
            .iter()
            .filter(|(_, vectors)| !vectors.is_empty())
            .map(|(name, vectors)| {
                (
                    name.clone(),
                    NamespaceStats {
                        vector_count: vectors.len() as u64,
                    },
                )
            })
            .collect();

        Ok(IndexStats {
            dimension: data.dimension,
            index_fullness: 0.0,
            total_vector_count: namespaces.values().map(|n| n.vector_count).sum(),
            namespaces,
        })
    }

    async fn fetch(
        &self,
        ids: &[String],
        namespace: Option<&str>,
    ) -> vecprobe_core::Result<HashMap<String, FetchedVector>> {
        let data = self.data.read().await;
        let Some(vectors) = data.namespaces.get(namespace.unwrap_or_default()) else {
            return Ok(HashMap::new());
        };

        Ok(vectors
            .iter()
            .filter(|v| ids.contains(&v.id))
            .map(|v| {
                (
                    v.id.clone(),
                    FetchedVector {
                        id: v.id.clone(),
                        metadata: v.metadata.clone(),
                    },
                )
            })
            .collect())
    }
}

/// Cosine similarity of two equal-length vectors
///
/// Returns 0.0 when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("text".into(), json!(value));
        metadata
    }

    #[test]
    fn test_cosine_orders_similarities() {
        let q = [1.0, 0.0, 0.0];
        let a = cosine_similarity(&q, &[1.0, 0.0, 0.0]);
        let b = cosine_similarity(&q, &[0.5, 0.5, 0.0]);
        let c = cosine_similarity(&q, &[0.0, 1.0, 0.0]);
        assert!(a > b && b > c);
        assert_eq!(cosine_similarity(&q, &[0.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let index = MemoryIndex::new(2);
        index.upsert(None, "far", vec![0.0, 1.0], text("far")).await.unwrap();
        index.upsert(None, "near", vec![1.0, 0.1], text("near")).await.unwrap();

        let matches = index.query(QueryRequest::new(vec![1.0, 0.0], 5)).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(matches.iter().all(|m| m.namespace.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_namespace_is_empty() {
        let index = MemoryIndex::new(2);
        index.upsert(Some("a"), "1", vec![1.0, 0.0], text("one")).await.unwrap();

        let request = QueryRequest::new(vec![1.0, 0.0], 5).with_namespace(Some("missing".into()));
        assert!(index.query(request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_and_fetch() {
        let index = MemoryIndex::new(2);
        index.upsert(Some("a"), "1", vec![1.0, 0.0], text("one")).await.unwrap();
        index.upsert(Some("a"), "2", vec![0.0, 1.0], text("two")).await.unwrap();
        index.upsert(Some("b"), "3", vec![1.0, 1.0], text("three")).await.unwrap();
        // Replaces, does not add
        index.upsert(Some("a"), "1", vec![1.0, 0.5], text("uno")).await.unwrap();

        let stats = index.describe_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 3);
        assert_eq!(stats.namespaces["a"].vector_count, 2);
        assert_eq!(stats.namespaces["b"].vector_count, 1);

        let fetched = index
            .fetch(&["1".to_string(), "3".to_string()], Some("a"))
            .await
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched["1"].metadata["text"], json!("uno"));
    }

    #[tokio::test]
    async fn test_dimension_is_enforced() {
        let index = MemoryIndex::new(3);
        let err = index.upsert(None, "x", vec![1.0], Metadata::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidDimension { expected: 3, got: 1 }));
    }

    #[tokio::test]
    async fn test_control_connect_and_create() {
        let control = MemoryControl::new();
        assert!(matches!(
            control.connect("docs").await,
            Err(CoreError::IndexNotFound(_))
        ));

        control.create_index(&IndexSpec::new("docs", 4)).await.unwrap();
        assert!(control.create_index(&IndexSpec::new("docs", 4)).await.is_err());
        assert_eq!(control.index_names().await, vec!["docs".to_string()]);

        let index = control.connect("docs").await.unwrap();
        let stats = index.describe_stats().await.unwrap();
        assert_eq!(stats.dimension, 4);
        assert_eq!(stats.total_vector_count, 0);
    }
}
