//! Prompt for generating recipes from the ingredients a user has at hand.

use std::collections::HashMap;
use std::sync::LazyLock;

use recipe_primitives::IngredientRequest;

use crate::template::{PromptTemplate, TemplateResult, bullet_list};

/// Prompt name used in logs.
pub const INGREDIENTS_PROMPT_NAME: &str = "generate_from_ingredients";

static TEMPLATE: LazyLock<PromptTemplate> = LazyLock::new(|| {
    PromptTemplate::builder(
        r#"You are an experienced home cook who writes clear, reliable recipes.

Suggest three different recipes that can be prepared mainly with the ingredients the user has available. Prefer recipes that use as many of them as possible. You may assume basic pantry staples (salt, pepper, oil, water) are on hand.

Available ingredients:
{{ingredients}}

{{#if restrictions}}
Dietary restrictions (every recipe must respect them):
{{restrictions}}
{{/if}}

For each recipe return:
- name: the name of the dish
- ingredientsRequired: every ingredient the recipe needs, with quantities
- availableIngredientsUsed: the available ingredients the recipe uses, spelled as the user wrote them
- instructions: numbered steps, each starting with its number, a period and a space ("1. ", "2. ", ...)
- difficulty: exactly one of easy, medium, advanced
- estimatedTime: the total preparation time, for example "35 minutes"

Write the recipes in the same language the ingredients are written in."#,
    )
    .with_required_variable("ingredients")
    .build()
});

/// Renders the ingredient prompt.
///
/// Ingredients are listed one per line; the restrictions block only appears
/// when the request carries restrictions.
///
/// # Errors
///
/// Returns [`TemplateError`](crate::TemplateError) if the ingredient list is blank.
pub fn render_ingredients_prompt(request: &IngredientRequest) -> TemplateResult<String> {
    let mut vars = HashMap::new();
    vars.insert(
        "ingredients".to_owned(),
        bullet_list(request.ingredients().split(',')),
    );
    if let Some(restrictions) = request.dietary_restrictions() {
        vars.insert("restrictions".to_owned(), restrictions.to_owned());
    }
    TEMPLATE.render_with(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_each_ingredient_on_its_own_line() {
        let prompt =
            render_ingredients_prompt(&IngredientRequest::new("tomato, rice ,, chicken")).unwrap();
        assert!(prompt.contains("- tomato\n- rice\n- chicken"));
        assert!(!prompt.contains("- \n"));
    }

    #[test]
    fn restrictions_block_is_conditional() {
        let plain = render_ingredients_prompt(&IngredientRequest::new("rice")).unwrap();
        assert!(!plain.contains("Dietary restrictions"));
        assert!(!plain.contains("\n\n\n"));

        let restricted = render_ingredients_prompt(
            &IngredientRequest::new("rice").with_dietary_restrictions("gluten free"),
        )
        .unwrap();
        assert!(restricted.contains("Dietary restrictions (every recipe must respect them):\ngluten free"));
    }

    #[test]
    fn user_text_is_not_expanded() {
        let prompt = render_ingredients_prompt(
            &IngredientRequest::new("rice, {{restrictions}}").with_dietary_restrictions("vegan"),
        )
        .unwrap();
        assert!(prompt.contains("- rice\n- {{restrictions}}"));
        assert!(!prompt.contains("- vegan"));
    }

    #[test]
    fn blank_ingredients_fail_to_render() {
        render_ingredients_prompt(&IngredientRequest::new(" , ")).expect_err("nothing to list");
    }
}
