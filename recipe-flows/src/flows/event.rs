//! Recipes for an event.

use async_trait::async_trait;
use recipe_primitives::validate::validate_event;
use recipe_primitives::{EventRequest, RecipeList};
use recipe_prompts::render_event_prompt;
use tracing::{info, warn};

use crate::contracts::{self, FlowContract};
use crate::error::FlowResult;
use crate::flow::Flow;
use crate::flows::format_recipes;
use crate::invoker::{ModelInvoker, Sampling};

/// Same creative sampling as the ingredient flow.
pub const SAMPLING: Sampling = Sampling::with_temperature(0.8);

/// Plans dishes for an event type, guest count and course.
#[derive(Clone, Debug)]
pub struct EventFlow {
    invoker: ModelInvoker,
}

impl EventFlow {
    /// Creates the flow on top of an invoker.
    #[must_use]
    pub const fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl Flow for EventFlow {
    type Input = EventRequest;
    type Output = RecipeList;

    fn contract(&self) -> &'static FlowContract {
        &contracts::EVENT
    }

    async fn run(&self, input: EventRequest) -> FlowResult<RecipeList> {
        let contract = self.contract();
        if let Err(err) = validate_event(&input) {
            warn!(flow = contract.name, %err, "rejected event request");
            return Err(err.into());
        }

        info!(
            flow = contract.name,
            event_type = input.event_type(),
            guests = input.number_of_guests(),
            meal_type = %input.meal_type(),
            "generating recipes for event"
        );
        let prompt = render_event_prompt(&input)?;
        let mut list: RecipeList = self
            .invoker
            .invoke(&prompt, &contract.output, contract.name, SAMPLING)
            .await?;

        format_recipes(&mut list);
        info!(flow = contract.name, recipes = list.recipes.len(), "recipes generated");
        Ok(list)
    }
}
