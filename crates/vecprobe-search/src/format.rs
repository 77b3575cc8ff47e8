//! Turning raw matches into display-ready documents

use vecprobe_core::{Document, Match, SearchResult, GITHUB_URL_FIELD};

/// Maps matches to documents and a single text blob
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    /// Separator placed between document contents in the formatted text
    pub const SEPARATOR: &'static str = "\n---\n";

    pub fn new() -> Self {
        Self
    }

    /// Format matches, preserving their order
    pub fn format(&self, matches: &[Match]) -> SearchResult {
        let documents: Vec<Document> = matches.iter().map(to_document).collect();
        let formatted_content = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join(Self::SEPARATOR);

        SearchResult {
            documents,
            formatted_content,
        }
    }
}

fn to_document(m: &Match) -> Document {
    Document {
        content: m.text().unwrap_or_default().to_string(),
        metadata: m.metadata.clone(),
        namespace: m.namespace.clone(),
        github_url: m.field(GITHUB_URL_FIELD).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use vecprobe_core::Metadata;

    fn hit(score: f32, metadata: Value, namespace: Option<&str>) -> Match {
        let Value::Object(metadata) = metadata else {
            panic!("metadata must be an object");
        };
        let m = Match::new("id", score, metadata);
        match namespace {
            Some(ns) => m.in_namespace(ns),
            None => m,
        }
    }

    #[test]
    fn test_format_documents_and_text() {
        let matches = vec![
            hit(0.9, json!({"text": "A", "github_url": "u1"}), Some("n1")),
            hit(0.5, json!({"text": "B"}), Some("n1")),
        ];

        let result = ResultFormatter::new().format(&matches);

        assert_eq!(result.formatted_content, "A\n---\nB");
        assert_eq!(result.documents.len(), 2);

        let first = &result.documents[0];
        assert_eq!(first.content, "A");
        assert_eq!(first.namespace.as_deref(), Some("n1"));
        assert_eq!(first.github_url, Some(json!("u1")));
        assert_eq!(first.metadata, matches[0].metadata);

        let second = serde_json::to_value(&result.documents[1]).unwrap();
        assert_eq!(
            second,
            json!({"content": "B", "metadata": {"text": "B"}, "namespace": "n1"})
        );
    }

    #[test]
    fn test_format_empty() {
        let result = ResultFormatter::new().format(&[]);
        assert!(result.documents.is_empty());
        assert_eq!(result.formatted_content, "");
    }

    #[test]
    fn test_missing_text_becomes_empty_content() {
        let matches = vec![
            hit(0.9, json!({"path": "src/lib.rs"}), None),
            hit(0.8, json!({"text": "C"}), None),
        ];
        let result = ResultFormatter::new().format(&matches);

        assert_eq!(result.documents[0].content, "");
        assert_eq!(result.documents[0].namespace, None);
        assert_eq!(result.formatted_content, "\n---\nC");
    }

    #[test]
    fn test_empty_github_url_is_kept() {
        let matches = vec![hit(0.9, json!({"text": "A", "github_url": ""}), Some("n1"))];
        let result = ResultFormatter::new().format(&matches);
        assert_eq!(result.documents[0].github_url, Some(json!("")));

        let none = ResultFormatter::new().format(&[Match::new("x", 0.1, Metadata::new())]);
        assert_eq!(none.documents[0].github_url, None);
    }
}
