//! Prompt for looking up one well-known recipe by name.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::template::{PromptTemplate, TemplateResult};

/// Prompt name used in logs.
pub const NAMED_RECIPE_PROMPT_NAME: &str = "get_named_recipe";

static TEMPLATE: LazyLock<PromptTemplate> = LazyLock::new(|| {
    PromptTemplate::builder(
        r#"You are a culinary reference. Give the traditional, most widely accepted version of the recipe "{{recipe_name}}".

If "{{recipe_name}}" is not a dish you know, return a recipe whose name starts with "Error:" followed by a short explanation, and leave every other field empty.

Return:
- name: the usual name of the dish
- ingredientsRequired: every ingredient with its quantity
- instructions: numbered steps; start each step with its number, a period and a space, and separate consecutive steps with a blank line
- difficulty: a short label such as easy, medium or advanced
- estimatedTime: the total preparation time

Write real line breaks inside the instructions text; do not write escape sequences such as \n.

Example of correctly formatted instructions:

1. Bring a large pot of salted water to the boil.

2. Cook the spaghetti until al dente, about 9 minutes.

3. Drain, toss with the sauce and serve immediately.

Write the recipe in the same language as the recipe name."#,
    )
    .with_required_variable("recipe_name")
    .build()
});

/// Renders the named-recipe prompt for an already validated, trimmed name.
///
/// # Errors
///
/// Returns [`TemplateError`](crate::TemplateError) if the name is blank.
pub fn render_named_recipe_prompt(recipe_name: &str) -> TemplateResult<String> {
    let mut vars = HashMap::new();
    vars.insert("recipe_name".to_owned(), recipe_name.to_owned());
    TEMPLATE.render_with(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_name_and_worked_example() {
        let prompt = render_named_recipe_prompt("Tortilla de patatas").unwrap();
        assert!(prompt.contains("\"Tortilla de patatas\""));
        assert!(prompt.contains("1. Bring a large pot"));
        assert!(prompt.contains("\n\n2. Cook the spaghetti"));
    }

    #[test]
    fn requires_a_name() {
        render_named_recipe_prompt("").expect_err("blank name");
    }
}
