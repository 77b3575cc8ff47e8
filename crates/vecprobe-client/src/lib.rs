//! Vecprobe Client - HTTP clients for the hosted services vecprobe talks to
//!
//! This crate provides:
//! - `OpenAiEmbeddings`: query embeddings from the OpenAI embeddings API
//! - `PineconeControl`: index lookup and creation on the Pinecone control plane
//! - `PineconeIndex`: query, stats and fetch against one Pinecone index

pub mod config;
pub mod error;
pub mod openai;
pub mod pinecone;

pub use config::*;
pub use error::*;
pub use openai::*;
pub use pinecone::*;
