//! Schema-validated recipe generation pipeline.
//!
//! Every flow runs `validate → render → invoke → [postprocess]`. The model
//! backend is reached only through [`recipe_adapters::ModelAdapter`], and its
//! answer is checked against the flow's output [`contracts`] before decoding.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use recipe_adapters::CannedAdapter;
//! use recipe_flows::{FlowKind, RecipeService};
//! use serde_json::json;
//!
//! # async fn demo() -> Result<(), recipe_flows::FlowError> {
//! let service = RecipeService::new(Arc::new(CannedAdapter::sketching()));
//! let url = service
//!     .dispatch(FlowKind::Image, json!({ "recipeName": "Paella" }))
//!     .await?;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, clippy::pedantic)]

pub mod contracts;
mod error;
mod flow;
pub mod flows;
mod invoker;
pub mod postprocess;
mod service;

pub use contracts::FlowContract;
pub use error::{FlowError, FlowResult, GenerationFailure, InvokeResult};
pub use flow::{Flow, decode_input};
pub use flows::{EventFlow, FilterFlow, ImageFlow, IngredientsFlow, NamedRecipeFlow};
pub use invoker::{ModelInvoker, Sampling};
pub use postprocess::format_instructions;
pub use service::{FlowKind, RecipeService, UnknownFlow};
