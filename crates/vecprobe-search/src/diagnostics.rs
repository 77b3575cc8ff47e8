//! Index inspection for when a search comes back empty
//!
//! Nothing here returns an error: every failed step is logged and leaves its
//! part of the report empty.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use vecprobe_core::{FetchedVector, IndexStats, Match, QueryRequest};

use crate::SearchService;

/// What a direct inspection of the index found
#[derive(Debug, Default)]
pub struct DiagnosticReport {
    /// Index statistics, if they could be read
    pub stats: Option<IndexStats>,

    /// Matches of an unmerged query against the default partition
    pub direct_matches: Vec<Match>,

    /// Stored metadata for the directly matched IDs
    pub fetched: HashMap<String, FetchedVector>,
}

impl DiagnosticReport {
    /// True when the index holds no vectors at all, as far as can be told
    pub fn index_is_empty(&self) -> bool {
        self.stats
            .as_ref()
            .map(|s| s.total_vector_count == 0)
            .unwrap_or(false)
    }
}

/// Inspect the index behind `service` for `query`
pub async fn inspect(service: &SearchService, query: &str, k: usize) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    match service.index().describe_stats().await {
        Ok(stats) => {
            info!(
                "Index has {} vectors (dimension {}, fullness {:.3})",
                stats.total_vector_count, stats.dimension, stats.index_fullness
            );
            for (namespace, ns) in &stats.namespaces {
                let name = if namespace.is_empty() { "<default>" } else { namespace.as_str() };
                info!("  namespace {}: {} vectors", name, ns.vector_count);
            }
            report.stats = Some(stats);
        }
        Err(e) => warn!("Could not read index stats: {}", e),
    }

    let embeddings = Arc::clone(service.embeddings());
    let text = query.to_string();
    let vector = match tokio::task::spawn_blocking(move || embeddings.embed_query_blocking(&text)).await {
        Ok(Ok(vector)) => vector,
        Ok(Err(e)) => {
            warn!("Could not embed query for inspection: {}", e);
            return report;
        }
        Err(e) => {
            warn!("Embedding task failed: {}", e);
            return report;
        }
    };
    info!("Query embedding has {} dimensions", vector.len());

    match service.index().query(QueryRequest::new(vector, k.max(1))).await {
        Ok(matches) => {
            info!("Direct query returned {} matches", matches.len());
            for m in &matches {
                info!("  {} (score {:.4})", m.id, m.score);
            }
            report.direct_matches = matches;
        }
        Err(e) => {
            warn!("Direct query failed: {}", e);
            return report;
        }
    }

    if report.direct_matches.is_empty() {
        return report;
    }

    let ids: Vec<String> = report.direct_matches.iter().map(|m| m.id.clone()).collect();
    match service.index().fetch(&ids, None).await {
        Ok(fetched) => {
            for (id, vector) in &fetched {
                let keys: Vec<&str> = vector.metadata.keys().map(String::as_str).collect();
                info!("  {} metadata keys: {}", id, keys.join(", "));
            }
            report.fetched = fetched;
        }
        Err(e) => warn!("Fetch failed: {}", e),
    }

    report
}
