//! Recipe records and flow results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix that marks a recipe as an in-band error value.
pub const ERROR_PREFIX: &str = "Error:";

/// How hard a recipe is to prepare.
///
/// Contracts that relax the enumeration decode unknown labels into
/// [`Difficulty::Other`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Beginner friendly.
    Easy,
    /// Some technique required.
    Medium,
    /// Demanding.
    Advanced,
    /// Free-form label.
    #[serde(untagged)]
    Other(String),
}

impl Difficulty {
    /// Wire values of the strict enumeration.
    pub const VALUES: [&'static str; 3] = ["easy", "medium", "advanced"];
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Advanced => "advanced",
            Self::Other(label) => label,
        })
    }
}

/// Preparation time, either in minutes or as prose ("about 1 hour").
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EstimatedTime {
    /// Whole minutes.
    Minutes(u32),
    /// Free text.
    Text(String),
}

impl EstimatedTime {
    /// Whether the value carries no information.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl Default for EstimatedTime {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for EstimatedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(minutes) => write!(f, "{minutes} min"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A single generated recipe.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Dish name, or an `Error: ...` message for the sentinel.
    pub name: String,
    /// Everything the dish needs.
    #[serde(default)]
    pub ingredients_required: Vec<String>,
    /// Numbered preparation steps.
    #[serde(default)]
    pub instructions: String,
    /// Subset of the user's ingredients the dish uses.
    #[serde(default)]
    pub available_ingredients_used: Vec<String>,
    /// Preparation difficulty.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Preparation time.
    #[serde(default)]
    pub estimated_time: EstimatedTime,
}

impl Recipe {
    /// Builds the error sentinel: `name` carries the message, everything else is empty.
    #[must_use]
    pub fn error(message: impl AsRef<str>) -> Self {
        Self {
            name: format!("{ERROR_PREFIX} {}", message.as_ref()),
            ..Self::default()
        }
    }

    /// Whether this recipe is an in-band error value.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.name.starts_with(ERROR_PREFIX)
    }
}

/// Result of the ingredient and event flows.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecipeList {
    /// Generated recipes.
    pub recipes: Vec<Recipe>,
}

/// Result of the filter flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilteredRecipes {
    /// Names from the input list that satisfy the restriction.
    pub filtered_recipes: Vec<String>,
}

/// Result of the image flow.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrl {
    /// Absolute URL of the generated image.
    pub image_url: String,
}

/// Any flow result, serialised without a tag.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GenerationResult {
    /// `{ "recipes": [...] }`
    Recipes(RecipeList),
    /// A single recipe or the error sentinel.
    Recipe(Recipe),
    /// `{ "imageUrl": "..." }`
    ImageUrl(ImageUrl),
    /// `{ "filteredRecipes": [...] }`
    FilteredRecipes(FilteredRecipes),
}

impl From<RecipeList> for GenerationResult {
    fn from(value: RecipeList) -> Self {
        Self::Recipes(value)
    }
}

impl From<Recipe> for GenerationResult {
    fn from(value: Recipe) -> Self {
        Self::Recipe(value)
    }
}

impl From<ImageUrl> for GenerationResult {
    fn from(value: ImageUrl) -> Self {
        Self::ImageUrl(value)
    }
}

impl From<FilteredRecipes> for GenerationResult {
    fn from(value: FilteredRecipes) -> Self {
        Self::FilteredRecipes(value)
    }
}
