//! Filter a list of recipe names by a dietary restriction.

use std::collections::HashSet;

use async_trait::async_trait;
use recipe_primitives::{FilterRequest, FilteredRecipes};
use recipe_prompts::render_filter_prompt;
use tracing::{debug, info, warn};

use crate::contracts::{self, FlowContract};
use crate::error::FlowResult;
use crate::flow::Flow;
use crate::invoker::{ModelInvoker, Sampling};

/// Deterministic sampling; this is a classification.
pub const SAMPLING: Sampling = Sampling::with_temperature(0.0);

/// Keeps the recipes a restricted diet allows.
///
/// The answer is always a subset of the input list, in input order,
/// spelled exactly as given and without duplicates. Names the model invents or rewrites are dropped.
#[derive(Clone, Debug)]
pub struct FilterFlow {
    invoker: ModelInvoker,
}

impl FilterFlow {
    /// Creates the flow on top of an invoker.
    #[must_use]
    pub const fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl Flow for FilterFlow {
    type Input = FilterRequest;
    type Output = FilteredRecipes;

    fn contract(&self) -> &'static FlowContract {
        &contracts::FILTER
    }

    async fn run(&self, input: FilterRequest) -> FlowResult<FilteredRecipes> {
        let contract = self.contract();
        if input.recipes().iter().all(|recipe| recipe.trim().is_empty()) {
            debug!(flow = contract.name, "nothing to filter");
            return Ok(FilteredRecipes::default());
        }

        info!(
            flow = contract.name,
            recipes = input.recipes().len(),
            restriction = input.dietary_restrictions(),
            "filtering recipes"
        );
        let prompt = render_filter_prompt(&input)?;
        let answer: FilteredRecipes = self
            .invoker
            .invoke(&prompt, &contract.output, contract.name, SAMPLING)
            .await?;

        let kept = restrict_to(input.recipes(), &answer.filtered_recipes);
        info!(flow = contract.name, kept = kept.len(), "recipes filtered");
        Ok(FilteredRecipes {
            filtered_recipes: kept,
        })
    }
}

/// Input names the model selected, compared trimmed and case-insensitively.
fn restrict_to(candidates: &[String], selected: &[String]) -> Vec<String> {
    let known: HashSet<String> = candidates.iter().map(|name| key(name)).collect();
    for name in selected {
        if !known.contains(&key(name)) {
            warn!(name = %name, "dropping recipe that is not in the input list");
        }
    }

    let wanted: HashSet<String> = selected.iter().map(|name| key(name)).collect();
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|name| {
            let name = key(name);
            wanted.contains(&name) && seen.insert(name)
        })
        .cloned()
        .collect()
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[test]
    fn keeps_input_order_and_spelling() {
        let kept = restrict_to(
            &names(&["Paella", "Gazpacho", "Caesar salad"]),
            &names(&["caesar salad", "Gazpacho"]),
        );
        assert_eq!(kept, names(&["Gazpacho", "Caesar salad"]));
    }

    #[test]
    fn drops_unknown_and_duplicate_names() {
        let kept = restrict_to(
            &names(&["Gazpacho", "Gazpacho ", "Paella"]),
            &names(&["Gazpacho", "Steak tartare", "Gazpacho"]),
        );
        assert_eq!(kept, names(&["Gazpacho"]));
    }

    #[test]
    fn returns_input_entries_verbatim() {
        let input = names(&[" Paella ", "Steak"]);
        let kept = restrict_to(&input, &names(&["Paella"]));
        assert_eq!(kept, names(&[" Paella "]));
        assert!(kept.iter().all(|name| input.contains(name)));
    }
}
