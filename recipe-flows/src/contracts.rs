//! Input and output contracts, one pair per flow.
//!
//! Input contracts check shape and types only; domain rules such as a
//! positive guest count stay in [`recipe_primitives::validate`] so their
//! messages reach the caller unchanged.

use std::sync::LazyLock;

use recipe_primitives::{Difficulty, Field, MealType, Schema};

/// Named input/output pair for one flow.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowContract {
    /// Flow name, also used as the schema name sent to providers.
    pub name: &'static str,
    /// Shape of the caller's JSON request.
    pub input: Schema,
    /// Shape the backend must answer with.
    pub output: Schema,
}

/// Generate recipes from a list of available ingredients.
pub static INGREDIENTS: LazyLock<FlowContract> = LazyLock::new(|| FlowContract {
    name: "generate_from_ingredients",
    input: Schema::object([
        Field::required("ingredients", Schema::string()),
        Field::optional("dietaryRestrictions", Schema::string()),
    ]),
    output: recipe_list(strict_recipe(true)),
});

/// Generate recipes for an event.
pub static EVENT: LazyLock<FlowContract> = LazyLock::new(|| FlowContract {
    name: "generate_for_event",
    input: Schema::object([
        Field::required("eventType", Schema::string()),
        Field::required("numberOfGuests", Schema::integer()),
        Field::required("mealType", Schema::enumeration(MealType::VALUES)),
        Field::optional("dietaryRestrictions", Schema::array(Schema::string())),
    ]),
    output: recipe_list(strict_recipe(false)),
});

/// Look up one recipe by name.
///
/// Strings may be empty so a model-reported `Error:` recipe conforms, and
/// `difficulty` is free text.
pub static NAMED_RECIPE: LazyLock<FlowContract> = LazyLock::new(|| FlowContract {
    name: "get_named_recipe",
    input: Schema::object([Field::required("recipeName", Schema::string())]),
    output: Schema::object([
        Field::required("name", Schema::string().non_empty()),
        Field::required("ingredientsRequired", Schema::array(Schema::string())),
        Field::required("instructions", Schema::string()),
        Field::required("difficulty", Schema::string()),
        Field::required("estimatedTime", estimated_time()),
    ]),
});

/// Keep the recipes compatible with a dietary restriction.
pub static FILTER: LazyLock<FlowContract> = LazyLock::new(|| FlowContract {
    name: "filter_by_restriction",
    input: Schema::object([
        Field::required("recipes", Schema::array(Schema::string())),
        Field::required("dietaryRestrictions", Schema::string()),
    ]),
    output: Schema::object([Field::required(
        "filteredRecipes",
        Schema::array(Schema::string().non_empty())
            .describe("Names copied verbatim from the input list"),
    )]),
});

/// Build an image URL for a dish.
pub static IMAGE: LazyLock<FlowContract> = LazyLock::new(|| FlowContract {
    name: "generate_image_url",
    input: Schema::object([Field::required("recipeName", Schema::string())]),
    output: Schema::object([Field::required("imageUrl", Schema::string().non_empty())]),
});

fn recipe_list(recipe: Schema) -> Schema {
    Schema::object([Field::required("recipes", Schema::array(recipe))])
}

fn strict_recipe(uses_available_ingredients: bool) -> Schema {
    let available = Schema::array(Schema::string())
        .describe("Which of the user's ingredients the recipe uses");
    let available = if uses_available_ingredients {
        Field::required("availableIngredientsUsed", available)
    } else {
        Field::optional("availableIngredientsUsed", available)
    };

    Schema::object([
        Field::required("name", Schema::string().non_empty()),
        Field::required(
            "ingredientsRequired",
            Schema::array(Schema::string().non_empty()).non_empty(),
        ),
        Field::required(
            "instructions",
            Schema::string()
                .non_empty()
                .describe("Numbered steps, each starting with `<n>. `"),
        ),
        available,
        Field::required("difficulty", Schema::enumeration(Difficulty::VALUES)),
        Field::required("estimatedTime", estimated_time()),
    ])
}

fn estimated_time() -> Schema {
    Schema::any_of([Schema::string(), Schema::integer().minimum(0)])
        .describe("Total preparation time, in minutes or as text")
}
