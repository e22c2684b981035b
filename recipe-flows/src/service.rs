//! Entry point bundling the five flows behind one backend.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use recipe_adapters::ModelAdapter;
use recipe_primitives::{
    EventRequest, FilterRequest, FilteredRecipes, GenerationResult, ImageRequest, ImageUrl,
    IngredientRequest, NamedRecipeRequest, Recipe, RecipeList,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::contracts::{self, FlowContract};
use crate::error::{FlowError, FlowResult};
use crate::flow::{Flow, decode_input};
use crate::flows::{EventFlow, FilterFlow, ImageFlow, IngredientsFlow, NamedRecipeFlow};
use crate::invoker::ModelInvoker;

/// Identifies a flow at the request boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// `generate-from-ingredients`
    Ingredients,
    /// `generate-for-event`
    Event,
    /// `get-named-recipe`
    NamedRecipe,
    /// `filter-by-restriction`
    Filter,
    /// `generate-image-url`
    Image,
}

impl FlowKind {
    /// Every flow, in documentation order.
    pub const ALL: [Self; 5] = [
        Self::Ingredients,
        Self::Event,
        Self::NamedRecipe,
        Self::Filter,
        Self::Image,
    ];

    /// Kebab-case name used on the command line and in routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingredients => "generate-from-ingredients",
            Self::Event => "generate-for-event",
            Self::NamedRecipe => "get-named-recipe",
            Self::Filter => "filter-by-restriction",
            Self::Image => "generate-image-url",
        }
    }

    /// Contracts of the flow.
    #[must_use]
    pub fn contract(self) -> &'static FlowContract {
        match self {
            Self::Ingredients => &contracts::INGREDIENTS,
            Self::Event => &contracts::EVENT,
            Self::NamedRecipe => &contracts::NAMED_RECIPE,
            Self::Filter => &contracts::FILTER,
            Self::Image => &contracts::IMAGE,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown flow name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown flow `{name}`")]
pub struct UnknownFlow {
    /// The rejected name.
    pub name: String,
}

impl FromStr for FlowKind {
    type Err = UnknownFlow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownFlow {
                name: wanted.to_owned(),
            })
    }
}

/// All flows sharing one model backend.
///
/// Cheap to clone and safe to share between tasks.
#[derive(Clone, Debug)]
pub struct RecipeService {
    ingredients: IngredientsFlow,
    event: EventFlow,
    named: NamedRecipeFlow,
    filter: FilterFlow,
    image: ImageFlow,
}

impl RecipeService {
    /// Builds the service around an adapter.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>) -> Self {
        Self::with_invoker(&ModelInvoker::new(adapter))
    }

    /// Builds the service around an existing invoker.
    #[must_use]
    pub fn with_invoker(invoker: &ModelInvoker) -> Self {
        Self {
            ingredients: IngredientsFlow::new(invoker.clone()),
            event: EventFlow::new(invoker.clone()),
            named: NamedRecipeFlow::new(invoker.clone()),
            filter: FilterFlow::new(invoker.clone()),
            image: ImageFlow,
        }
    }

    /// Recipes using the caller's ingredients.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] for an implausible ingredient list,
    /// or a prompt or generation failure.
    pub async fn generate_from_ingredients(
        &self,
        request: IngredientRequest,
    ) -> FlowResult<RecipeList> {
        self.ingredients.run(request).await
    }

    /// Recipes for an event.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] for a blank event type or a
    /// non-positive guest count, or a prompt or generation failure.
    pub async fn generate_for_event(&self, request: EventRequest) -> FlowResult<RecipeList> {
        self.event.run(request).await
    }

    /// The traditional recipe for a dish name, or the `Error:` sentinel.
    pub async fn get_named_recipe(&self, request: NamedRecipeRequest) -> Recipe {
        match self.named.run(request).await {
            Ok(recipe) => recipe,
            Err(err) => Recipe::error(err.to_string()),
        }
    }

    /// The input recipes compatible with a restriction.
    ///
    /// # Errors
    ///
    /// Returns a prompt or generation failure.
    pub async fn filter_by_restriction(
        &self,
        request: FilterRequest,
    ) -> FlowResult<FilteredRecipes> {
        self.filter.run(request).await
    }

    /// The image URL for a dish.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other flows.
    pub async fn generate_image_url(&self, request: ImageRequest) -> FlowResult<ImageUrl> {
        self.image.run(request).await
    }

    /// Runs a flow on caller JSON and returns the typed result.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidInput`] when `input` does not match the
    /// flow's input contract, otherwise whatever the flow returns.
    pub async fn run(&self, kind: FlowKind, input: Value) -> FlowResult<GenerationResult> {
        let result = match kind {
            FlowKind::Ingredients => run_json(&self.ingredients, input).await,
            FlowKind::Event => run_json(&self.event, input).await,
            FlowKind::NamedRecipe => run_json(&self.named, input).await,
            FlowKind::Filter => run_json(&self.filter, input).await,
            FlowKind::Image => run_json(&self.image, input).await,
        };
        if let Err(err) = &result {
            if err.is_client_error() {
                info!(flow = %kind, %err, "request rejected");
            } else {
                warn!(flow = %kind, %err, "flow failed");
            }
        }
        result
    }

    /// JSON in, JSON out: the request boundary.
    ///
    /// # Errors
    ///
    /// See [`RecipeService::run`]; additionally [`FlowError::Encode`] if the
    /// result cannot be serialised.
    pub async fn dispatch(&self, kind: FlowKind, input: Value) -> FlowResult<Value> {
        let result = self.run(kind, input).await?;
        serde_json::to_value(&result).map_err(|err| FlowError::Encode {
            reason: err.to_string(),
        })
    }
}

async fn run_json<F: Flow>(flow: &F, input: Value) -> FlowResult<GenerationResult> {
    let request: F::Input = decode_input(flow.contract(), input)?;
    flow.run(request).await.map(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_names_round_trip() {
        for kind in FlowKind::ALL {
            assert_eq!(kind.as_str().parse::<FlowKind>().unwrap(), kind);
        }
        let err = "generate-everything".parse::<FlowKind>().expect_err("unknown");
        assert_eq!(err.name, "generate-everything");
    }

    #[test]
    fn contracts_match_kinds() {
        assert_eq!(FlowKind::Filter.contract().name, "filter_by_restriction");
        assert_eq!(FlowKind::Image.contract().name, "generate_image_url");
    }
}
