//! Vecprobe CLI - embed a query and print what the vector index returns
//!
//! Usage: `vecprobe [QUERY WORDS...]`. Credentials, index name, namespaces and
//! result count come from the environment (see `config.rs`).

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vecprobe_client::{OpenAiEmbeddings, PineconeControl};
use vecprobe_core::SearchResult;
use vecprobe_search::{connect_or_create, inspect, RetrievalTool, SearchService};

use crate::config::Settings;

const DEFAULT_QUERY: &str = "How do I clone a GitHub repository?";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vecprobe=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let query = query_from_args(std::env::args().skip(1));
    let settings = Settings::from_env().context("Failed to load settings")?;
    info!(
        "Processing query '{}' with k={}, namespaces={:?}",
        query, settings.top_k, settings.namespaces
    );

    let tool = connect(&settings).await?;
    let result = tool
        .execute(&query, settings.top_k, &settings.namespaces)
        .await
        .context("Search failed")?;

    if result.is_empty() {
        println!("No results found.");
        warn!("Search returned no documents, inspecting the index directly");
        let report = inspect(tool.service(), &query, settings.top_k).await;
        if report.index_is_empty() {
            println!("Index {} contains no vectors.", settings.index.name);
        } else if !report.direct_matches.is_empty() {
            println!(
                "A direct query without namespaces found {} matches; check the namespace settings.",
                report.direct_matches.len()
            );
        }
        return Ok(());
    }

    print_result(&result)?;
    Ok(())
}

/// Build the embedding client and connect to (or create) the index
async fn connect(settings: &Settings) -> Result<RetrievalTool> {
    let embeddings = OpenAiEmbeddings::new(settings.embedding.clone())
        .context("Failed to create embedding client")?;
    let control =
        PineconeControl::new(settings.pinecone.clone()).context("Failed to create Pinecone client")?;
    let index = connect_or_create(&control, &settings.index)
        .await
        .context("Failed to initialize Pinecone service")?;

    Ok(RetrievalTool::new(SearchService::new(
        Arc::new(embeddings),
        Arc::new(index),
    )))
}

/// All arguments joined with spaces, or the default query when there are none
fn query_from_args(args: impl IntoIterator<Item = String>) -> String {
    let query = args.into_iter().collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        query
    }
}

fn print_result(result: &SearchResult) -> Result<()> {
    for (i, doc) in result.documents.iter().enumerate() {
        println!("#### Result {}", i + 1);
        println!("Content:\n{}", doc.content);
        println!("Metadata:\n{}", serde_json::to_string_pretty(&doc.metadata)?);
        if let Some(namespace) = &doc.namespace {
            println!("Namespace: {}", namespace);
        }
        if let Some(url) = &doc.github_url {
            println!("View on GitHub: {}", display_url(url));
        }
        println!("---");
    }

    println!("\nFormatted content:\n{}", result.formatted_content);
    Ok(())
}

/// Strings print bare, anything else as JSON
fn display_url(url: &serde_json::Value) -> String {
    url.as_str()
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_query_joins_arguments() {
        assert_eq!(
            query_from_args(args(&["how", "do", "I", "clone"])),
            "how do I clone"
        );
    }

    #[test]
    fn test_query_defaults_when_empty() {
        assert_eq!(query_from_args(args(&[])), DEFAULT_QUERY);
        assert_eq!(query_from_args(args(&["  "])), DEFAULT_QUERY);
    }

    #[test]
    fn test_display_url_strips_quotes_from_strings() {
        let url = serde_json::json!("https://github.com/o/r");
        assert_eq!(display_url(&url), "https://github.com/o/r");
        assert_eq!(display_url(&serde_json::json!(42)), "42");
        assert_eq!(display_url(&serde_json::json!(["a"])), r#"["a"]"#);
    }
}
