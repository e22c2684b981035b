//! Domain checks applied to requests before any backend call.

use crate::error::{ValidationError, ValidationResult};
use crate::request::{EventRequest, IngredientRequest, NamedRecipeRequest};

/// Shown when an ingredient list contains nothing that looks like food.
pub const INGREDIENTS_MESSAGE: &str =
    "Please enter only comma-separated food ingredients. Example: tomato, rice, chicken";
/// Shown when the event type is blank.
pub const EVENT_TYPE_MESSAGE: &str = "Please enter the type of event.";
/// Shown when the guest count is zero or negative.
pub const GUESTS_MESSAGE: &str = "The number of guests must be greater than zero.";
/// Shown when a recipe name is too short to look up.
pub const SHORT_NAME_MESSAGE: &str = "The recipe name must be at least 3 characters long.";

/// Minimum number of characters in a recipe name, after trimming.
pub const MIN_RECIPE_NAME_CHARS: usize = 3;

/// Returns `true` when at least one comma-separated token is made of letters
/// and spaces only and is longer than two characters.
///
/// Letters are Unicode letters, so `"piña"` or `"jalapeño"` qualify.
#[must_use]
pub fn is_valid_ingredient_input(input: &str) -> bool {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .any(is_ingredient_token)
}

fn is_ingredient_token(token: &str) -> bool {
    token.chars().count() > 2 && token.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// Checks an ingredient request.
///
/// # Errors
///
/// Returns [`ValidationError`] with [`INGREDIENTS_MESSAGE`] when the list
/// contains no plausible ingredient.
pub fn validate_ingredients(request: &IngredientRequest) -> ValidationResult<()> {
    if is_valid_ingredient_input(request.ingredients()) {
        Ok(())
    } else {
        Err(ValidationError::new(INGREDIENTS_MESSAGE))
    }
}

/// Checks an event request.
///
/// # Errors
///
/// Returns [`ValidationError`] when the event type is blank or the guest
/// count is not positive.
pub fn validate_event(request: &EventRequest) -> ValidationResult<()> {
    if request.event_type().trim().is_empty() {
        return Err(ValidationError::new(EVENT_TYPE_MESSAGE));
    }
    if request.number_of_guests() <= 0 {
        return Err(ValidationError::new(GUESTS_MESSAGE));
    }
    Ok(())
}

/// Checks a named-recipe request and returns the trimmed name.
///
/// # Errors
///
/// Returns [`ValidationError`] with [`SHORT_NAME_MESSAGE`] when the trimmed
/// name has fewer than [`MIN_RECIPE_NAME_CHARS`] characters.
pub fn validate_recipe_name(request: &NamedRecipeRequest) -> ValidationResult<&str> {
    let name = request.recipe_name().trim();
    if name.chars().count() < MIN_RECIPE_NAME_CHARS {
        return Err(ValidationError::new(SHORT_NAME_MESSAGE));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::request::MealType;

    #[test]
    fn accepts_regular_lists() {
        assert!(is_valid_ingredient_input("tomato, rice, chicken"));
        assert!(is_valid_ingredient_input("  olive oil ,, 12"));
        assert!(is_valid_ingredient_input("piña, jalapeño"));
    }

    #[test]
    fn rejects_lists_without_food_tokens() {
        assert!(!is_valid_ingredient_input(""));
        assert!(!is_valid_ingredient_input(" , ,, "));
        assert!(!is_valid_ingredient_input("123, 456"));
        assert!(!is_valid_ingredient_input("a, b, c"));
        assert!(!is_valid_ingredient_input("!!!, ???"));
        assert!(!is_valid_ingredient_input("ab, 2 eggs"));
    }

    #[test]
    fn ingredient_request_carries_display_message() {
        let err = validate_ingredients(&IngredientRequest::new("42")).expect_err("numeric");
        assert_eq!(err.message(), INGREDIENTS_MESSAGE);
    }

    #[test]
    fn event_rules() {
        validate_event(&EventRequest::new("wedding", 80, MealType::Main)).expect("valid");

        let err = validate_event(&EventRequest::new("  ", 80, MealType::Main))
            .expect_err("blank event");
        assert_eq!(err.message(), EVENT_TYPE_MESSAGE);

        for guests in [0, -3] {
            let err = validate_event(&EventRequest::new("party", guests, MealType::Starter))
                .expect_err("non-positive guests");
            assert_eq!(err.message(), GUESTS_MESSAGE);
        }
    }

    #[test]
    fn recipe_name_is_trimmed_before_counting() {
        assert_eq!(
            validate_recipe_name(&NamedRecipeRequest::new("  paella ")).unwrap(),
            "paella"
        );
        validate_recipe_name(&NamedRecipeRequest::new(" ab  ")).expect_err("too short");
        validate_recipe_name(&NamedRecipeRequest::new("ñu ")).expect_err("two chars");
        validate_recipe_name(&NamedRecipeRequest::new("ñoq")).expect("three chars");
    }

    proptest! {
        #[test]
        fn any_alphabetic_token_makes_input_valid(
            word in "[a-zA-ZáéíóúñÁÉÍÓÚÑ]{3,12}",
            noise in proptest::collection::vec("[0-9!?.#]{0,4}", 0..5),
            position in 0usize..5,
        ) {
            let mut tokens = noise;
            let index = position.min(tokens.len());
            tokens.insert(index, word);
            prop_assert!(is_valid_ingredient_input(&tokens.join(", ")));
        }

        #[test]
        fn numeric_input_is_never_valid(numbers in proptest::collection::vec(0u32..10_000, 0..6)) {
            let input = numbers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            prop_assert!(!is_valid_ingredient_input(&input));
        }

        #[test]
        fn single_character_tokens_are_never_valid(
            letters in proptest::collection::vec("[a-zA-Z ]{1}", 0..8),
        ) {
            prop_assert!(!is_valid_ingredient_input(&letters.join(",")));
        }
    }
}
