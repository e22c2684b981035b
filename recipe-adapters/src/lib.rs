//! Model adapters producing schema-constrained JSON.
//!
//! Each module exposes an implementation for a specific provider while sharing
//! the trait-based interface defined in [`traits`].

#![warn(missing_docs, clippy::pedantic)]

pub mod canned;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod traits;

mod http_client;

pub use canned::{CannedAdapter, CannedReply, Fallback};
pub use traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, MessageRole,
    ModelAdapter, PromptMessage, StructuredRequest,
};
