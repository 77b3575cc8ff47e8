//! Vecprobe Search - Similarity search over a hosted vector index
//!
//! This crate provides:
//! - `SearchService`: embeds a query once and fans it out across namespaces
//! - `ResultFormatter`: turns matches into display-ready documents
//! - `RetrievalTool`: the `search_knowledge_base` tool contract
//! - Index provisioning, diagnostics and an in-memory index backend

pub mod diagnostics;
pub mod error;
pub mod format;
pub mod memory;
pub mod provision;
pub mod service;
pub mod tool;

pub use diagnostics::*;
pub use error::*;
pub use format::*;
pub use memory::*;
pub use provision::*;
pub use service::*;
pub use tool::*;
