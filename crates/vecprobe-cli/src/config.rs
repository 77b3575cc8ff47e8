//! Settings loaded from the environment

use anyhow::{anyhow, Context, Result};
use vecprobe_client::{EmbeddingConfig, PineconeConfig};
use vecprobe_core::IndexSpec;

/// Everything the CLI needs to run one query
#[derive(Debug, Clone)]
pub struct Settings {
    pub embedding: EmbeddingConfig,
    pub pinecone: PineconeConfig,
    pub index: IndexSpec,
    pub namespaces: Vec<String>,
    pub top_k: usize,
}

impl Settings {
    pub const DEFAULT_TOP_K: usize = 3;

    /// Load settings from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let mut embedding = EmbeddingConfig::new(required("OPENAI_API_KEY")?);
        if let Some(model) = get("EMBEDDING_MODEL") {
            embedding.model = model;
        }
        if let Some(dimension) = get("EMBEDDING_DIMENSION") {
            embedding.dimension = dimension
                .trim()
                .parse()
                .with_context(|| format!("EMBEDDING_DIMENSION is not a number: {}", dimension))?;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            embedding.base_url = base_url;
        }

        let mut pinecone = PineconeConfig::new(required("PINECONE_API_KEY")?);
        if let Some(control_url) = get("PINECONE_CONTROL_URL") {
            pinecone.control_url = control_url;
        }

        let mut index = IndexSpec::new(required("PINECONE_INDEX")?, embedding.dimension);
        if let Some(cloud) = get("PINECONE_CLOUD") {
            index.cloud = cloud;
        }
        if let Some(region) = get("PINECONE_REGION") {
            index.region = region;
        }

        let namespaces = get("VECPROBE_NAMESPACES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|ns| !ns.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let top_k = match get("VECPROBE_TOP_K") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("VECPROBE_TOP_K is not a number: {}", raw))?,
            None => Self::DEFAULT_TOP_K,
        };
        if top_k == 0 {
            return Err(anyhow!("VECPROBE_TOP_K must be at least 1"));
        }

        Ok(Self {
            embedding,
            pinecone,
            index,
            namespaces,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("OPENAI_API_KEY", "sk-test"),
        ("PINECONE_API_KEY", "pc-test"),
        ("PINECONE_INDEX", "docs"),
    ];

    #[test]
    fn test_defaults() {
        let s = settings(&REQUIRED).unwrap();
        assert_eq!(s.embedding.model, "text-embedding-3-small");
        assert_eq!(s.index.name, "docs");
        assert_eq!(s.index.dimension, 1536);
        assert_eq!(s.index.region, "us-east-1");
        assert!(s.namespaces.is_empty());
        assert_eq!(s.top_k, 3);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("EMBEDDING_MODEL", "text-embedding-3-large"),
            ("EMBEDDING_DIMENSION", "3072"),
            ("VECPROBE_NAMESPACES", "repo_githubcloner, docs,,"),
            ("VECPROBE_TOP_K", "5"),
            ("PINECONE_REGION", "eu-west-1"),
        ]);
        let s = settings(&pairs).unwrap();

        assert_eq!(s.embedding.model, "text-embedding-3-large");
        assert_eq!(s.index.dimension, 3072);
        assert_eq!(s.namespaces, vec!["repo_githubcloner", "docs"]);
        assert_eq!(s.top_k, 5);
        assert_eq!(s.index.region, "eu-west-1");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = settings(&REQUIRED[..2]).unwrap_err();
        assert!(err.to_string().contains("PINECONE_INDEX"));
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("VECPROBE_TOP_K", "many"));
        assert!(settings(&pairs).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("VECPROBE_TOP_K", "0"));
        assert!(settings(&pairs).is_err());
    }
}
