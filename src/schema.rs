// 📐 Shape Layer - Recipe Validation
// Checks a draft against every recipe invariant before it is persisted

use crate::entities::{Difficulty, Ingredient, Recipe, RecipeImage, Step, Taxonomy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const TITLE_MAX_CHARS: usize = 150;

// ============================================================================
// DRAFT
// ============================================================================

/// A recipe as submitted, before any invariant is checked.
///
/// Scalar fields are optional because a submission may omit them. Numbers
/// that were present but unreadable are carried as `NaN` so the validator can
/// tell "missing" from "not a number".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub prep_time: Option<f64>,
    pub servings: Option<f64>,
    pub difficulty: Option<String>,
    pub categories: Vec<String>,
    pub image: Option<RecipeImage>,
}

impl From<Recipe> for RecipeDraft {
    fn from(recipe: Recipe) -> Self {
        RecipeDraft {
            title: Some(recipe.title),
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            prep_time: Some(recipe.prep_time),
            servings: Some(f64::from(recipe.servings)),
            difficulty: Some(recipe.difficulty.as_str().to_string()),
            categories: recipe.categories,
            image: recipe.image,
        }
    }
}

/// Draft contents after validation, with every field in its final type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFields {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub prep_time: f64,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub image: Option<RecipeImage>,
}

impl RecipeFields {
    pub fn into_recipe(
        self,
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Recipe {
        Recipe {
            id,
            title: self.title,
            ingredients: self.ingredients,
            steps: self.steps,
            prep_time: self.prep_time,
            servings: self.servings,
            difficulty: self.difficulty,
            categories: self.categories,
            image: self.image,
            created_at,
            updated_at,
        }
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Field name → human-readable message. One message per field: the first
/// violation found for a field is the one reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// RECIPE VALIDATOR
// ============================================================================

/// Enforces the recipe invariants against an injected category taxonomy.
#[derive(Debug, Clone)]
pub struct RecipeValidator {
    taxonomy: Taxonomy,
}

impl RecipeValidator {
    pub fn new(taxonomy: Taxonomy) -> Self {
        RecipeValidator { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Report every violation in the draft at once, or convert it to typed
    /// fields when there are none.
    pub fn check(&self, draft: RecipeDraft) -> Result<RecipeFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = check_title(draft.title.as_deref(), &mut errors);

        let ingredients: Vec<Ingredient> = draft
            .ingredients
            .into_iter()
            .filter(|i| !i.text.trim().is_empty())
            .collect();
        if ingredients.is_empty() {
            errors.add("ingredients", "At least one ingredient is required");
        }

        let steps: Vec<Step> = draft
            .steps
            .into_iter()
            .filter(|s| !s.description.trim().is_empty())
            .collect();
        if steps.is_empty() {
            errors.add("steps", "At least one step is required");
        }

        let prep_time = check_prep_time(draft.prep_time, &mut errors);
        let servings = check_servings(draft.servings, &mut errors);
        let difficulty = check_difficulty(draft.difficulty.as_deref(), &mut errors);
        self.check_categories(&draft.categories, &mut errors);

        if let Some(image) = &draft.image {
            if image.content_type.trim().is_empty() {
                errors.add(
                    "imageContentType",
                    "Image content type is required when an image is present",
                );
            }
        }

        match (title, prep_time, servings, difficulty) {
            (Some(title), Some(prep_time), Some(servings), Some(difficulty)) if errors.is_empty() => {
                Ok(RecipeFields {
                    title,
                    ingredients,
                    steps,
                    prep_time,
                    servings,
                    difficulty,
                    categories: draft.categories,
                    image: draft.image,
                })
            }
            _ => Err(errors),
        }
    }

    fn check_categories(&self, categories: &[String], errors: &mut ValidationErrors) {
        if categories.is_empty() {
            errors.add("categories", "At least one category is required");
            return;
        }

        if !categories.iter().all(|c| self.taxonomy.contains(c)) {
            errors.add("categories", "All categories must be from the predefined taxonomy");
            return;
        }

        let has_duplicates = categories
            .iter()
            .enumerate()
            .any(|(i, c)| categories[..i].contains(c));
        if has_duplicates {
            errors.add("categories", "Duplicate categories are not allowed");
        }
    }
}

fn check_title(title: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    let title = title.map(str::trim).unwrap_or_default();

    if title.is_empty() {
        errors.add("title", "Title is required");
        return None;
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        errors.add("title", "Title cannot exceed 150 characters");
        return None;
    }

    Some(title.to_string())
}

fn check_prep_time(prep_time: Option<f64>, errors: &mut ValidationErrors) -> Option<f64> {
    match prep_time {
        None => errors.add("prepTime", "Preparation time is required"),
        Some(v) if !v.is_finite() => errors.add("prepTime", "Preparation time must be a number"),
        Some(v) if v < 1.0 => errors.add("prepTime", "Preparation time must be a positive number"),
        Some(v) => return Some(v),
    }
    None
}

fn check_servings(servings: Option<f64>, errors: &mut ValidationErrors) -> Option<u32> {
    match servings {
        None => errors.add("servings", "Servings is required"),
        Some(v) if !v.is_finite() => errors.add("servings", "Servings must be a number"),
        Some(v) if v < 1.0 => errors.add("servings", "Servings must be a positive number"),
        Some(v) if v.fract() != 0.0 => errors.add("servings", "Servings must be a whole number"),
        Some(v) if v > f64::from(u32::MAX) => errors.add("servings", "Servings is too large"),
        Some(v) => return Some(v as u32),
    }
    None
}

fn check_difficulty(difficulty: Option<&str>, errors: &mut ValidationErrors) -> Option<Difficulty> {
    match difficulty.map(str::trim) {
        None | Some("") => {
            errors.add("difficulty", "Difficulty level is required");
            None
        }
        Some(level) => match level.parse::<Difficulty>() {
            Ok(difficulty) => Some(difficulty),
            Err(_) => {
                errors.add("difficulty", "Difficulty must be Easy, Medium, or Hard");
                None
            }
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
