//! Prompt for planning recipes around an event.

use std::collections::HashMap;
use std::sync::LazyLock;

use recipe_primitives::EventRequest;

use crate::template::{PromptTemplate, TemplateResult, bullet_list};

/// Prompt name used in logs.
pub const EVENT_PROMPT_NAME: &str = "generate_for_event";

static TEMPLATE: LazyLock<PromptTemplate> = LazyLock::new(|| {
    PromptTemplate::builder(
        r#"You are a professional caterer planning the menu for an event.

Event: {{event_type}}
Number of guests: {{guests}}
Course: {{meal_type}}

{{#if restrictions}}
Every recipe must be suitable for guests with these dietary restrictions:
{{restrictions}}
{{/if}}

Suggest three {{meal_type}} recipes that fit the occasion and scale every quantity to serve {{guests}} guests.

For each recipe return:
- name: the name of the dish
- ingredientsRequired: every ingredient with the quantity needed for {{guests}} guests
- availableIngredientsUsed: an empty list
- instructions: numbered steps, each starting with its number, a period and a space ("1. ", "2. ", ...)
- difficulty: exactly one of easy, medium, advanced
- estimatedTime: the total preparation time, for example "2 hours""#,
    )
    .with_required_variable("event_type")
    .with_required_variable("guests")
    .build()
});

/// Renders the event prompt.
///
/// # Errors
///
/// Returns [`TemplateError`](crate::TemplateError) if the event type is blank.
pub fn render_event_prompt(request: &EventRequest) -> TemplateResult<String> {
    let mut vars = HashMap::new();
    vars.insert("event_type".to_owned(), request.event_type().trim().to_owned());
    vars.insert("guests".to_owned(), request.number_of_guests().to_string());
    vars.insert("meal_type".to_owned(), request.meal_type().to_string());

    let restrictions = bullet_list(request.dietary_restrictions());
    if !restrictions.is_empty() {
        vars.insert("restrictions".to_owned(), restrictions);
    }
    TEMPLATE.render_with(&vars)
}

#[cfg(test)]
mod tests {
    use recipe_primitives::MealType;

    use super::*;

    #[test]
    fn substitutes_event_fields() {
        let prompt =
            render_event_prompt(&EventRequest::new("wedding", 40, MealType::Starter)).unwrap();
        assert!(prompt.contains("Event: wedding"));
        assert!(prompt.contains("Number of guests: 40"));
        assert!(prompt.contains("Suggest three starter recipes"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn restrictions_render_one_per_line() {
        let request = EventRequest::new("birthday", 8, MealType::Dessert)
            .with_dietary_restrictions(["vegan", " ", "nut free"]);
        let prompt = render_event_prompt(&request).unwrap();
        assert!(prompt.contains("- vegan\n- nut free"));
    }

    #[test]
    fn empty_restrictions_leave_no_header() {
        let request =
            EventRequest::new("birthday", 8, MealType::Dessert).with_dietary_restrictions(["  "]);
        let prompt = render_event_prompt(&request).unwrap();
        assert!(!prompt.contains("dietary restrictions"));
        assert!(!prompt.contains("\n- \n"));
    }
}
