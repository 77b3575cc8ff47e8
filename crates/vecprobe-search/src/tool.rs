//! The `search_knowledge_base` retrieval tool
//!
//! Wraps search and formatting behind the function-calling contract used to
//! expose the index to a chat model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use vecprobe_core::SearchResult;

use crate::{ResultFormatter, Result, SearchError, SearchService};

/// Arguments of a `search_knowledge_base` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolArguments {
    /// The search query
    pub query: String,

    pub options: ToolOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOptions {
    /// Number of results to return
    pub num_results: usize,

    /// Namespaces to search in
    pub namespaces: Vec<String>,
}

/// Search plus formatting, as a callable tool
pub struct RetrievalTool {
    service: SearchService,
    formatter: ResultFormatter,
}

impl RetrievalTool {
    pub const NAME: &'static str = "search_knowledge_base";
    pub const DESCRIPTION: &'static str = "Search the knowledge base to find relevant documentation and code snippets that help answer the question.";

    pub fn new(service: SearchService) -> Self {
        Self {
            service,
            formatter: ResultFormatter::new(),
        }
    }

    pub fn service(&self) -> &SearchService {
        &self.service
    }

    /// Function tool definition in the OpenAI tools format
    pub fn definition() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": Self::NAME,
                "description": Self::DESCRIPTION,
                "parameters": {
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query to find relevant documentation"
                        },
                        "options": {
                            "type": "object",
                            "properties": {
                                "num_results": {
                                    "type": "number",
                                    "description": "Number of results to return"
                                },
                                "namespaces": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "List of namespaces to search in"
                                }
                            },
                            "required": ["num_results", "namespaces"]
                        }
                    },
                    "required": ["query", "options"]
                }
            }
        })
    }

    /// Search and format the results
    pub async fn execute(&self, query: &str, k: usize, namespaces: &[String]) -> Result<SearchResult> {
        let matches = self.service.similarity_search(query, k, namespaces).await?;
        let result = self.formatter.format(&matches);
        info!("Retrieval returned {} documents", result.documents.len());
        Ok(result)
    }

    /// Execute a tool call from its JSON argument string
    pub async fn execute_call(&self, arguments: &str) -> Result<SearchResult> {
        let args: ToolArguments = serde_json::from_str(arguments).map_err(|e| {
            SearchError::InvalidRequest(format!("malformed {} arguments: {}", Self::NAME, e))
        })?;
        self.execute(&args.query, args.options.num_results, &args.options.namespaces)
            .await
    }
}
