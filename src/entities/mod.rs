// Entity Models
//
// Recipe is the only root entity. Ingredient and Step are value objects
// embedded in it; the category taxonomy is read-only reference data.

pub mod category;
pub mod recipe;

pub use category::{Taxonomy, DEFAULT_CATEGORIES};
pub use recipe::{Difficulty, Ingredient, Recipe, RecipeImage, RecipeSummary, Step};
