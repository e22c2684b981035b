//! Prompt builders for the recipe generation flows.
//!
//! Every flow owns one fixed template. Builders populate its variables from a
//! typed request and never call a model.

#![warn(missing_docs, clippy::pedantic)]

pub mod event;
pub mod filter;
pub mod image;
pub mod ingredients;
pub mod named_recipe;
pub mod template;

pub use event::{EVENT_PROMPT_NAME, render_event_prompt};
pub use filter::{FILTER_PROMPT_NAME, render_filter_prompt};
pub use image::{IMAGE_BASE_URL, IMAGE_STYLE_SUFFIX, image_phrase, image_url};
pub use ingredients::{INGREDIENTS_PROMPT_NAME, render_ingredients_prompt};
pub use named_recipe::{NAMED_RECIPE_PROMPT_NAME, render_named_recipe_prompt};
pub use template::{PromptTemplate, TemplateBuilder, TemplateError, TemplateResult};
