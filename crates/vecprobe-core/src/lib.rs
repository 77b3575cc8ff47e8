//! Vecprobe Core - Core types and traits for probing a hosted vector index
//!
//! This crate defines the data model shared by the rest of vecprobe:
//! - `Match`: a single scored hit returned by a nearest-neighbor query
//! - `Document` / `SearchResult`: display-ready search output
//! - `IndexStats` / `IndexSpec`: index description and provisioning parameters
//! - `EmbeddingProvider`, `VectorIndex`, `IndexControl`: the external collaborators

pub mod document;
pub mod index;
pub mod provider;
pub mod error;

pub use document::*;
pub use index::*;
pub use provider::*;
pub use error::*;
