//! Pinecone control-plane and data-plane clients

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;
use vecprobe_core::{
    FetchedVector, IndexControl, IndexSpec, IndexStats, Match, Metadata, Metric, NamespaceStats,
    QueryRequest, VectorIndex,
};

use crate::config::{endpoint, parse_base_url, PineconeConfig};
use crate::error::{ClientError, Result};

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

// ============================================================================
// Wire types
// ============================================================================

/// Index description as returned by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    /// Data-plane host, usually without a scheme
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: Metric,
    spec: CreateIndexSpec<'a>,
}

#[derive(Serialize)]
struct CreateIndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredVector>,
}

#[derive(Deserialize)]
struct ScoredVector {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceSummary>,
    #[serde(default)]
    dimension: usize,
    #[serde(default)]
    index_fullness: f32,
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceSummary {
    #[serde(default)]
    vector_count: u64,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, FetchedRecord>,
}

#[derive(Deserialize)]
struct FetchedRecord {
    id: String,
    #[serde(default)]
    metadata: Option<Metadata>,
}

/// Turn a response into JSON, or into an HTTP error carrying the body
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.json().await?)
}

fn authorized(builder: RequestBuilder, config: &PineconeConfig) -> RequestBuilder {
    builder
        .header(API_KEY_HEADER, &config.api_key)
        .header(API_VERSION_HEADER, &config.api_version)
}

// ============================================================================
// Control plane
// ============================================================================

/// Client for the Pinecone control plane
pub struct PineconeControl {
    config: PineconeConfig,
    base_url: Url,
    http: Client,
}

impl PineconeControl {
    pub fn new(config: PineconeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config("Pinecone API key is empty".into()));
        }
        let base_url = parse_base_url(&config.control_url)?;

        Ok(Self {
            config,
            base_url,
            http: Client::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = endpoint(&self.base_url, path)?;
        Ok(authorized(self.http.request(method, url), &self.config))
    }

    /// Describe an index; `ClientError::NotFound` when it does not exist
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let resp = self
            .request(Method::GET, &format!("indexes/{}", name))?
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(name.to_string()));
        }
        read_json(resp).await
    }

    /// Create a serverless index
    pub async fn create(&self, spec: &IndexSpec) -> Result<IndexDescription> {
        let body = CreateIndexRequest {
            name: &spec.name,
            dimension: spec.dimension,
            metric: spec.metric,
            spec: CreateIndexSpec {
                serverless: ServerlessSpec {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };

        let resp = self.request(Method::POST, "indexes")?.json(&body).send().await?;
        let description: IndexDescription = read_json(resp).await?;
        info!("Requested index {} on {}", description.name, description.host);
        Ok(description)
    }

    /// Open a data-plane connection to a described index
    pub fn index(&self, description: &IndexDescription) -> Result<PineconeIndex> {
        PineconeIndex::new(self.config.clone(), &description.host)
    }
}

#[async_trait]
impl IndexControl for PineconeControl {
    type Index = PineconeIndex;

    async fn connect(&self, name: &str) -> vecprobe_core::Result<PineconeIndex> {
        let description = self.describe_index(name).await?;
        debug!(
            "Index {} at {} (ready: {})",
            description.name, description.host, description.status.ready
        );
        Ok(self.index(&description)?)
    }

    async fn create_index(&self, spec: &IndexSpec) -> vecprobe_core::Result<()> {
        self.create(spec).await?;
        Ok(())
    }
}

// ============================================================================
// Data plane
// ============================================================================

/// Client for one Pinecone index
pub struct PineconeIndex {
    config: PineconeConfig,
    base_url: Url,
    http: Client,
}

impl PineconeIndex {
    /// Connect to an index host; a bare host name is reached over HTTPS
    pub fn new(config: PineconeConfig, host: &str) -> Result<Self> {
        let raw = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        let base_url = parse_base_url(&raw)?;

        Ok(Self {
            config,
            base_url,
            http: Client::new(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        authorized(self.http.request(method, url), &self.config)
    }

    /// Nearest-neighbor query
    pub async fn query_vectors(&self, request: &QueryRequest) -> Result<Vec<Match>> {
        let body = QueryBody {
            vector: &request.vector,
            top_k: request.top_k,
            include_metadata: request.include_metadata,
            namespace: request.namespace.as_deref(),
        };

        let url = endpoint(&self.base_url, "query")?;
        let resp = self.request(Method::POST, url).json(&body).send().await?;
        let parsed: QueryResponse = read_json(resp).await?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| Match::new(m.id, m.score, m.metadata.unwrap_or_default()))
            .collect())
    }

    /// Index statistics
    pub async fn stats(&self) -> Result<IndexStats> {
        let url = endpoint(&self.base_url, "describe_index_stats")?;
        let resp = self
            .request(Method::POST, url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let parsed: StatsResponse = read_json(resp).await?;

        Ok(IndexStats {
            dimension: parsed.dimension,
            index_fullness: parsed.index_fullness,
            total_vector_count: parsed.total_vector_count,
            namespaces: parsed
                .namespaces
                .into_iter()
                .map(|(name, ns)| {
                    (
                        name,
                        NamespaceStats {
                            vector_count: ns.vector_count,
                        },
                    )
                })
                .collect(),
        })
    }

    /// Look up vectors by ID
    pub async fn fetch_vectors(
        &self,
        ids: &[String],
        namespace: Option<&str>,
    ) -> Result<HashMap<String, FetchedVector>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut url = endpoint(&self.base_url, "vectors/fetch")?;
        {
            let mut pairs = url.query_pairs_mut();
            for id in ids {
                pairs.append_pair("ids", id);
            }
            if let Some(namespace) = namespace {
                pairs.append_pair("namespace", namespace);
            }
        }

        let resp = self.request(Method::GET, url).send().await?;
        let parsed: FetchResponse = read_json(resp).await?;

        Ok(parsed
            .vectors
            .into_iter()
            .map(|(key, record)| {
                (
                    key,
                    FetchedVector {
                        id: record.id,
                        metadata: record.metadata.unwrap_or_default(),
                    },
                )
            })
            .collect())
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, request: QueryRequest) -> vecprobe_core::Result<Vec<Match>> {
        Ok(self.query_vectors(&request).await?)
    }

    async fn describe_stats(&self) -> vecprobe_core::Result<IndexStats> {
        Ok(self.stats().await?)
    }

    async fn fetch(
        &self,
        ids: &[String],
        namespace: Option<&str>,
    ) -> vecprobe_core::Result<HashMap<String, FetchedVector>> {
        Ok(self.fetch_vectors(ids, namespace).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_uses_https() {
        let index = PineconeIndex::new(PineconeConfig::new("k"), "docs-abc.svc.pinecone.io").unwrap();
        assert_eq!(index.url().as_str(), "https://docs-abc.svc.pinecone.io/");

        let index = PineconeIndex::new(PineconeConfig::new("k"), "http://127.0.0.1:5080").unwrap();
        assert_eq!(index.url().scheme(), "http");
    }

    #[test]
    fn test_query_body_wire_names() {
        let vector = [0.5, 0.25];
        let body = QueryBody {
            vector: &vector,
            top_k: 3,
            include_metadata: true,
            namespace: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"vector": [0.5, 0.25], "topK": 3, "includeMetadata": true})
        );
    }

    #[test]
    fn test_control_rejects_empty_key() {
        assert!(matches!(
            PineconeControl::new(PineconeConfig::new("")),
            Err(ClientError::Config(_))
        ));
    }
}
