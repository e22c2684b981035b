//! Structured LLM recipe generation facade.
//!
//! Depend on this crate via `cargo add recipe-genie`. It bundles the
//! workspace crates behind feature flags so downstream users can pull in only
//! the pieces they need, for example the primitives and flows without the
//! configuration layer.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use recipe_primitives as primitives;

/// Prompt templates (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use recipe_prompts as prompts;

/// Model adapters (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use recipe_adapters as adapters;

/// Generation flows and the request boundary (enabled by `flows` feature).
#[cfg(feature = "flows")]
pub use recipe_flows as flows;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use recipe_config as config;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use recipe_telemetry as telemetry;

/// Adapter construction from configuration (enabled by `adapters` + `config`).
#[cfg(all(feature = "adapters", feature = "config"))]
pub mod backend;
