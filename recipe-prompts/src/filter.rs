//! Prompt for filtering a list of recipe names by a dietary restriction.

use std::collections::HashMap;
use std::sync::LazyLock;

use recipe_primitives::FilterRequest;

use crate::template::{PromptTemplate, TemplateResult, bullet_list};

/// Prompt name used in logs.
pub const FILTER_PROMPT_NAME: &str = "filter_by_restriction";

static TEMPLATE: LazyLock<PromptTemplate> = LazyLock::new(|| {
    PromptTemplate::builder(
        r#"You are a nutrition expert.

Dietary restriction: {{restrictions}}

Recipes:
{{recipes}}

Return in filteredRecipes the recipes from the list above that a person with this restriction can eat as usually prepared. Copy each name exactly as it appears in the list. Do not add, rename or merge recipes. If none qualify, return an empty list."#,
    )
    .build()
});

/// Renders the filter prompt, one recipe per line.
///
/// # Errors
///
/// Returns [`TemplateError`](crate::TemplateError) only for a malformed template.
pub fn render_filter_prompt(request: &FilterRequest) -> TemplateResult<String> {
    let mut vars = HashMap::new();
    vars.insert(
        "restrictions".to_owned(),
        request.dietary_restrictions().trim().to_owned(),
    );
    vars.insert("recipes".to_owned(), bullet_list(request.recipes()));
    TEMPLATE.render_with(&vars)
}
