//! OpenAI embeddings client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use vecprobe_core::{Embedding, EmbeddingProvider};

use crate::config::{endpoint, parse_base_url, EmbeddingConfig};
use crate::error::{ClientError, Result};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// Embeds queries with the OpenAI `/embeddings` endpoint
pub struct OpenAiEmbeddings {
    config: EmbeddingConfig,
    url: Url,
    http: Client,
}

impl OpenAiEmbeddings {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config("OpenAI API key is empty".into()));
        }
        let url = endpoint(&parse_base_url(&config.base_url)?, "embeddings")?;
        debug!("Embedding with {} via {}", config.model, url);

        Ok(Self {
            config,
            url,
            http: Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn payload<'a>(&'a self, text: &'a str) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.config.model,
            input: [text],
        }
    }

    fn extract(&self, response: EmbeddingResponse) -> Result<Embedding> {
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ClientError::Decode("embedding response has no data".into()))?;

        if embedding.len() != self.config.dimension {
            return Err(ClientError::InvalidDimension {
                expected: self.config.dimension,
                got: embedding.len(),
            });
        }
        Ok(embedding)
    }

    /// Embed a query
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let resp = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = resp.json().await?;
        self.extract(parsed)
    }

    /// Embed a query, blocking the current thread
    ///
    /// Must not be called from an async worker thread; use `spawn_blocking`.
    pub fn embed_blocking(&self, text: &str) -> Result<Embedding> {
        let http = reqwest::blocking::Client::new();
        let resp = http
            .post(self.url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(text))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = resp.json()?;
        self.extract(parsed)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_query(&self, text: &str) -> vecprobe_core::Result<Embedding> {
        self.embed(text).await.map_err(ClientError::into_embedding_error)
    }

    fn embed_query_blocking(&self, text: &str) -> vecprobe_core::Result<Embedding> {
        self.embed_blocking(text)
            .map_err(ClientError::into_embedding_error)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(matches!(
            OpenAiEmbeddings::new(EmbeddingConfig::new(" ")),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_payload_shape() {
        let client = OpenAiEmbeddings::new(EmbeddingConfig::new("sk-test")).unwrap();
        let value = serde_json::to_value(client.payload("hello")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"model": "text-embedding-3-small", "input": ["hello"]})
        );
    }
}
