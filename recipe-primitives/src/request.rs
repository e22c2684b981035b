//! Caller-supplied generation requests, one record per flow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate recipes from a comma-separated list of available ingredients.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    ingredients: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dietary_restrictions: Option<String>,
}

impl IngredientRequest {
    /// Creates a request for the supplied ingredient list.
    #[must_use]
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            dietary_restrictions: None,
        }
    }

    /// Adds free-text dietary restrictions.
    #[must_use]
    pub fn with_dietary_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.dietary_restrictions = Some(restrictions.into());
        self
    }

    /// Returns the raw ingredient list as typed by the user.
    #[must_use]
    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    /// Returns the restrictions when present and not blank.
    #[must_use]
    pub fn dietary_restrictions(&self) -> Option<&str> {
        self.dietary_restrictions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Course served at an event.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Appetiser or first course.
    Starter,
    /// Main course.
    Main,
    /// Sweet course.
    Dessert,
}

impl MealType {
    /// Wire values accepted for this enum.
    pub const VALUES: [&'static str; 3] = ["starter", "main", "dessert"];
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Starter => "starter",
            Self::Main => "main",
            Self::Dessert => "dessert",
        })
    }
}

/// Generate recipes suited to an event.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    event_type: String,
    number_of_guests: i64,
    meal_type: MealType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dietary_restrictions: Vec<String>,
}

impl EventRequest {
    /// Creates an event request.
    #[must_use]
    pub fn new(event_type: impl Into<String>, number_of_guests: i64, meal_type: MealType) -> Self {
        Self {
            event_type: event_type.into(),
            number_of_guests,
            meal_type,
            dietary_restrictions: Vec::new(),
        }
    }

    /// Sets the dietary restrictions that every recipe must honour.
    #[must_use]
    pub fn with_dietary_restrictions<I, S>(mut self, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_restrictions = restrictions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the kind of event (wedding, birthday, ...).
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the number of guests as supplied.
    #[must_use]
    pub const fn number_of_guests(&self) -> i64 {
        self.number_of_guests
    }

    /// Returns the requested course.
    #[must_use]
    pub const fn meal_type(&self) -> MealType {
        self.meal_type
    }

    /// Returns the non-blank restrictions, trimmed.
    pub fn dietary_restrictions(&self) -> impl Iterator<Item = &str> {
        self.dietary_restrictions
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
    }
}

/// Look up a single recipe by name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamedRecipeRequest {
    recipe_name: String,
}

impl NamedRecipeRequest {
    /// Creates a lookup for the supplied recipe name.
    #[must_use]
    pub fn new(recipe_name: impl Into<String>) -> Self {
        Self {
            recipe_name: recipe_name.into(),
        }
    }

    /// Returns the recipe name as supplied.
    #[must_use]
    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }
}

/// Build an illustrative image URL for a dish.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    recipe_name: String,
}

impl ImageRequest {
    /// Creates an image request for the supplied dish name.
    #[must_use]
    pub fn new(recipe_name: impl Into<String>) -> Self {
        Self {
            recipe_name: recipe_name.into(),
        }
    }

    /// Returns the dish name as supplied.
    #[must_use]
    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }
}

/// Keep only the recipes from a list that satisfy a restriction.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    recipes: Vec<String>,
    dietary_restrictions: String,
}

impl FilterRequest {
    /// Creates a filter request.
    #[must_use]
    pub fn new<I, S>(recipes: I, dietary_restrictions: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recipes: recipes.into_iter().map(Into::into).collect(),
            dietary_restrictions: dietary_restrictions.into(),
        }
    }

    /// Returns the candidate recipe names.
    #[must_use]
    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// Returns the restriction to filter by.
    #[must_use]
    pub fn dietary_restrictions(&self) -> &str {
        &self.dietary_restrictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_event_request() {
        let request: EventRequest = serde_json::from_str(
            r#"{"eventType": "birthday", "numberOfGuests": 12, "mealType": "dessert",
                "dietaryRestrictions": ["vegan", "  "]}"#,
        )
        .unwrap();

        assert_eq!(request.event_type(), "birthday");
        assert_eq!(request.number_of_guests(), 12);
        assert_eq!(request.meal_type(), MealType::Dessert);
        assert_eq!(request.dietary_restrictions().collect::<Vec<_>>(), ["vegan"]);
    }

    #[test]
    fn blank_restrictions_read_as_absent() {
        let request = IngredientRequest::new("rice").with_dietary_restrictions("   ");
        assert_eq!(request.dietary_restrictions(), None);

        let request = IngredientRequest::new("rice").with_dietary_restrictions(" vegan ");
        assert_eq!(request.dietary_restrictions(), Some("vegan"));
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        let err = serde_json::from_str::<EventRequest>(
            r#"{"eventType": "party", "numberOfGuests": 3, "mealType": "brunch"}"#,
        );
        assert!(err.is_err());
    }
}
