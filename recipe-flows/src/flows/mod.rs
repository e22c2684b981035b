//! The five flow orchestrators.

mod event;
mod filter;
mod image;
mod ingredients;
mod named_recipe;

pub use event::EventFlow;
pub use filter::FilterFlow;
pub use image::ImageFlow;
pub use ingredients::IngredientsFlow;
pub use named_recipe::NamedRecipeFlow;

use recipe_primitives::RecipeList;

use crate::postprocess::format_instructions;

/// Applies the instruction formatting once to every recipe in the list.
fn format_recipes(list: &mut RecipeList) {
    for recipe in &mut list.recipes {
        recipe.instructions = format_instructions(&recipe.instructions);
    }
}
