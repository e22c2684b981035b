//! Core shared types for recipe generation flows.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod recipe;
mod request;
mod schema;
pub mod validate;

/// Error types shared across the workspace.
pub use error::{SchemaViolation, ValidationError, ValidationResult};
/// Recipe records and flow results.
pub use recipe::{
    Difficulty, ERROR_PREFIX, EstimatedTime, FilteredRecipes, GenerationResult, ImageUrl, Recipe,
    RecipeList,
};
/// Caller-supplied requests.
pub use request::{
    EventRequest, FilterRequest, ImageRequest, IngredientRequest, MealType, NamedRecipeRequest,
};
/// Schema contract description and conformance checking.
pub use schema::{Field, Schema, SchemaKind};
