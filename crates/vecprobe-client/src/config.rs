//! Client configuration
//!
//! Credentials and endpoints are passed explicitly to each client at
//! construction; nothing is read from process-wide state here.

use std::fmt;

use url::Url;

use crate::error::{ClientError, Result};

/// Configuration for the OpenAI embeddings client
#[derive(Clone)]
pub struct EmbeddingConfig {
    /// OpenAI API key
    pub api_key: String,

    /// Embedding model name
    pub model: String,

    /// API base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Output dimension of `model`
    pub dimension: usize,
}

impl EmbeddingConfig {
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_DIMENSION: usize = 1536;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            dimension: Self::DEFAULT_DIMENSION,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Configuration for the Pinecone clients
#[derive(Clone)]
pub struct PineconeConfig {
    /// Pinecone API key
    pub api_key: String,

    /// Control-plane URL
    pub control_url: String,

    /// Value of the `X-Pinecone-API-Version` header
    pub api_version: String,
}

impl PineconeConfig {
    pub const DEFAULT_CONTROL_URL: &'static str = "https://api.pinecone.io";
    pub const DEFAULT_API_VERSION: &'static str = "2024-07";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            control_url: Self::DEFAULT_CONTROL_URL.to_string(),
            api_version: Self::DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_control_url(mut self, control_url: impl Into<String>) -> Self {
        self.control_url = control_url.into();
        self
    }
}

impl fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("control_url", &self.control_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Parse a base URL so that relative endpoint paths join beneath it
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url: Url = raw
        .parse()
        .map_err(|e| ClientError::Config(format!("Invalid URL {}: {}", raw, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Join an endpoint path onto a base URL from `parse_base_url`
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| ClientError::Config(format!("Invalid endpoint {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = parse_base_url("https://api.openai.com/v1").unwrap();
        assert_eq!(
            endpoint(&base, "embeddings").unwrap().as_str(),
            "https://api.openai.com/v1/embeddings"
        );

        let base = parse_base_url("http://localhost:8080").unwrap();
        assert_eq!(
            endpoint(&base, "indexes/docs").unwrap().as_str(),
            "http://localhost:8080/indexes/docs"
        );
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        assert!(matches!(parse_base_url("not a url"), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = EmbeddingConfig::new("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));

        let config = PineconeConfig::new("pc-secret");
        assert!(!format!("{:?}", config).contains("pc-secret"));
    }
}
