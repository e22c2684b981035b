//! Lookup of one well-known recipe by name.
//!
//! This flow never fails: a short name, a model-reported unknown dish and
//! any generation failure all come back as the `Error:` sentinel recipe.

use async_trait::async_trait;
use recipe_primitives::validate::validate_recipe_name;
use recipe_primitives::{NamedRecipeRequest, Recipe};
use recipe_prompts::render_named_recipe_prompt;
use tracing::{info, warn};

use crate::contracts::{self, FlowContract};
use crate::error::FlowResult;
use crate::flow::Flow;
use crate::invoker::{ModelInvoker, Sampling};
use crate::postprocess::format_instructions;

/// Low temperature; the traditional version is wanted, not a variation.
pub const SAMPLING: Sampling = Sampling::with_temperature(0.2);

/// Fetches the canonical recipe for a dish name.
#[derive(Clone, Debug)]
pub struct NamedRecipeFlow {
    invoker: ModelInvoker,
}

impl NamedRecipeFlow {
    /// Creates the flow on top of an invoker.
    #[must_use]
    pub const fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    async fn lookup(&self, input: &NamedRecipeRequest) -> Recipe {
        let contract = self.contract();
        let name = match validate_recipe_name(input) {
            Ok(name) => name,
            Err(err) => {
                warn!(flow = contract.name, %err, "recipe name rejected");
                return Recipe::error(err.message());
            }
        };

        info!(flow = contract.name, recipe = name, "looking up recipe");
        let prompt = match render_named_recipe_prompt(name) {
            Ok(prompt) => prompt,
            Err(err) => {
                warn!(flow = contract.name, %err, "prompt rendering failed");
                return Recipe::error(unavailable(name));
            }
        };

        let recipe: Recipe = match self
            .invoker
            .invoke(&prompt, &contract.output, contract.name, SAMPLING)
            .await
        {
            Ok(recipe) => recipe,
            Err(err) => {
                warn!(flow = contract.name, recipe = name, %err, "returning error recipe");
                return Recipe::error(unavailable(name));
            }
        };

        if recipe.is_error() {
            warn!(flow = contract.name, reply = %recipe.name, "model does not know the recipe");
            return Recipe {
                name: recipe.name,
                ..Recipe::default()
            };
        }

        Recipe {
            instructions: format_instructions(&recipe.instructions),
            ..recipe
        }
    }
}

fn unavailable(name: &str) -> String {
    format!("Could not get the recipe for \"{name}\". Please try again later.")
}

#[async_trait]
impl Flow for NamedRecipeFlow {
    type Input = NamedRecipeRequest;
    type Output = Recipe;

    fn contract(&self) -> &'static FlowContract {
        &contracts::NAMED_RECIPE
    }

    async fn run(&self, input: NamedRecipeRequest) -> FlowResult<Recipe> {
        Ok(self.lookup(&input).await)
    }
}
