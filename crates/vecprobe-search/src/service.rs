//! Similarity search across one or more namespaces

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};
use vecprobe_core::{CoreError, Embedding, EmbeddingProvider, Match, QueryRequest, VectorIndex};

use crate::{Result, SearchError};

/// What happened when one namespace was queried
#[derive(Debug)]
pub enum NamespaceStatus {
    /// The query succeeded and contributed this many matches before ranking
    Succeeded { match_count: usize },

    /// The query failed and the namespace was skipped
    Failed { error: CoreError },
}

/// Per-namespace outcome of a search
#[derive(Debug)]
pub struct NamespaceOutcome {
    pub namespace: String,
    pub status: NamespaceStatus,
}

impl NamespaceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, NamespaceStatus::Failed { .. })
    }
}

/// Matches of a search plus what happened in each namespace
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Final ranked matches
    pub matches: Vec<Match>,

    /// One entry per namespace searched, in request order; empty for a default-partition search
    pub outcomes: Vec<NamespaceOutcome>,
}

impl SearchReport {
    /// Namespaces whose query failed
    pub fn failed_namespaces(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.namespace.as_str())
            .collect()
    }
}

/// Embeds queries and runs them against a vector index
pub struct SearchService {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl SearchService {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embeddings, index }
    }

    pub fn embeddings(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embeddings
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Search for the `k` best matches to `query`
    ///
    /// With no namespaces the default partition is searched and the index's
    /// own ordering is returned untouched. With namespaces, each is queried
    /// for `k` matches, and the combined set is ranked by score and cut to `k`.
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        namespaces: &[String],
    ) -> Result<Vec<Match>> {
        Ok(self
            .similarity_search_with_report(query, k, namespaces)
            .await?
            .matches)
    }

    /// Like `similarity_search`, also reporting which namespaces failed
    pub async fn similarity_search_with_report(
        &self,
        query: &str,
        k: usize,
        namespaces: &[String],
    ) -> Result<SearchReport> {
        validate_request(query, k)?;

        let vector = self.embeddings.embed_query(query).await.map_err(|e| {
            error!("Failed to embed query: {}", e);
            SearchError::search("embed query", e)
        })?;
        debug!("Embedded query into {} dimensions", vector.len());

        if namespaces.is_empty() {
            let matches = self
                .index
                .query(QueryRequest::new(vector, k))
                .await
                .map_err(|e| {
                    error!("Failed to query index: {}", e);
                    SearchError::search("query index", e)
                })?;
            info!("Retrieved {} matches from the default namespace", matches.len());
            return Ok(SearchReport {
                matches,
                outcomes: Vec::new(),
            });
        }

        let namespaces = dedup(namespaces);
        let results = join_all(
            namespaces
                .iter()
                .map(|namespace| self.query_namespace(&vector, k, namespace)),
        )
        .await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut batches = Vec::with_capacity(results.len());
        for (namespace, result) in namespaces.iter().zip(results) {
            let status = match result {
                Ok(matches) => {
                    let match_count = matches.len();
                    batches.push(matches);
                    NamespaceStatus::Succeeded { match_count }
                }
                Err(e) => {
                    warn!("Error searching namespace {}: {}", namespace, e);
                    NamespaceStatus::Failed { error: e }
                }
            };
            outcomes.push(NamespaceOutcome {
                namespace: namespace.to_string(),
                status,
            });
        }

        if batches.is_empty() {
            warn!("No namespace answered; returning no matches");
        }

        let matches = merge_ranked(batches, k);
        info!(
            "Retrieved {} matches across {} namespaces",
            matches.len(),
            namespaces.len()
        );
        Ok(SearchReport { matches, outcomes })
    }

    async fn query_namespace(
        &self,
        vector: &Embedding,
        k: usize,
        namespace: &str,
    ) -> vecprobe_core::Result<Vec<Match>> {
        let request =
            QueryRequest::new(vector.clone(), k).with_namespace(Some(namespace.to_string()));
        let matches = self.index.query(request).await?;
        debug!("Namespace {} returned {} matches", namespace, matches.len());
        Ok(matches
            .into_iter()
            .map(|m| m.in_namespace(namespace))
            .collect())
    }
}

/// Concatenate batches in order, rank by score descending and keep the best `k`
///
/// The sort is stable, so equal scores keep their first-seen order. Scores are
/// compared with `f32::total_cmp`: `-0.0` ranks below `0.0` and NaN above every
/// real score, where a plain float comparison would call them ties.
pub fn merge_ranked(batches: Vec<Vec<Match>>, k: usize) -> Vec<Match> {
    let mut all: Vec<Match> = batches.into_iter().flatten().collect();
    all.sort_by(|a, b| b.score.total_cmp(&a.score));
    all.truncate(k);
    all
}

fn validate_request(query: &str, k: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidRequest("query must not be empty".into()));
    }
    if k == 0 {
        return Err(SearchError::InvalidRequest("k must be at least 1".into()));
    }
    Ok(())
}

/// Drop repeated namespaces, keeping first occurrences in order
fn dedup(namespaces: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(namespaces.len());
    for namespace in namespaces {
        if !seen.contains(&namespace.as_str()) {
            seen.push(namespace.as_str());
        }
    }
    seen
}
