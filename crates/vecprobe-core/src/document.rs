//! Match and document types - what a similarity search hands back

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary metadata stored alongside a vector
///
/// Kept as a generic map: fields such as `text` or `github_url` are looked up,
/// so "absent" and "present but empty" stay distinguishable.
pub type Metadata = Map<String, Value>;

/// Metadata key holding the document text
pub const TEXT_FIELD: &str = "text";

/// Metadata key holding an optional source link
pub const GITHUB_URL_FIELD: &str = "github_url";

/// A single item returned by a nearest-neighbor query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Vector ID within the index
    pub id: String,

    /// Similarity score (higher is more similar)
    pub score: f32,

    /// Metadata stored with the vector
    #[serde(default)]
    pub metadata: Metadata,

    /// Namespace the match came from; `None` when the default partition was searched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Match {
    /// Create an untagged match
    pub fn new(id: impl Into<String>, score: f32, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            score,
            metadata,
            namespace: None,
        }
    }

    /// Tag the match with the namespace it was retrieved from
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Look up a metadata field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// The `text` metadata field, if present and a string
    pub fn text(&self) -> Option<&str> {
        self.field(TEXT_FIELD).and_then(Value::as_str)
    }
}

/// A display-ready document derived from a `Match`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document text (`metadata["text"]`, or empty)
    pub content: String,

    /// Full metadata of the underlying match
    pub metadata: Metadata,

    /// Source namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Source link, only present when the metadata carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<Value>,
}

/// Formatted output of a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Documents in result order
    pub documents: Vec<Document>,

    /// Document contents joined with a separator
    pub formatted_content: String,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
