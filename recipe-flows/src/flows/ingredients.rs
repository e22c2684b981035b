//! Recipes from a list of available ingredients.

use async_trait::async_trait;
use recipe_primitives::validate::validate_ingredients;
use recipe_primitives::{IngredientRequest, RecipeList};
use recipe_prompts::render_ingredients_prompt;
use tracing::{info, warn};

use crate::contracts::{self, FlowContract};
use crate::error::FlowResult;
use crate::flow::Flow;
use crate::flows::format_recipes;
use crate::invoker::{ModelInvoker, Sampling};

/// Creative sampling; variety across calls is wanted.
pub const SAMPLING: Sampling = Sampling::with_temperature(0.8);

/// Suggests recipes that use the caller's ingredients.
#[derive(Clone, Debug)]
pub struct IngredientsFlow {
    invoker: ModelInvoker,
}

impl IngredientsFlow {
    /// Creates the flow on top of an invoker.
    #[must_use]
    pub const fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl Flow for IngredientsFlow {
    type Input = IngredientRequest;
    type Output = RecipeList;

    fn contract(&self) -> &'static FlowContract {
        &contracts::INGREDIENTS
    }

    async fn run(&self, input: IngredientRequest) -> FlowResult<RecipeList> {
        let contract = self.contract();
        if let Err(err) = validate_ingredients(&input) {
            warn!(flow = contract.name, %err, "rejected ingredient list");
            return Err(err.into());
        }

        info!(
            flow = contract.name,
            restricted = input.dietary_restrictions().is_some(),
            "generating recipes from ingredients"
        );
        let prompt = render_ingredients_prompt(&input)?;
        let mut list: RecipeList = self
            .invoker
            .invoke(&prompt, &contract.output, contract.name, SAMPLING)
            .await?;

        format_recipes(&mut list);
        info!(flow = contract.name, recipes = list.recipes.len(), "recipes generated");
        Ok(list)
    }
}
