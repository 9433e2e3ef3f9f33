// Recipe Catalog - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filter;
pub mod intake;
pub mod parser;
pub mod schema;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use entities::{
    Difficulty, Ingredient, Recipe, RecipeImage, RecipeSummary, Step, Taxonomy, DEFAULT_CATEGORIES,
};
pub use error::{CatalogError, Result};
pub use filter::{ListParams, RecipeFilter, SortMode};
pub use intake::RecipeSubmission;
pub use parser::{normalize_ingredients, normalize_steps, parse_ingredient, IngredientInput, StepInput};
pub use schema::{RecipeDraft, RecipeValidator, ValidationErrors};
pub use store::RecipeStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
