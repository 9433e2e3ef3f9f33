// 📥 Recipe Intake - submitted field bundle → draft
//
// A create/update request arrives as flat string fields (multipart or
// urlencoded). Array fields are JSON-encoded, numbers are numeric strings.
// Intake decodes them, runs the ingredient/step parser, and hands a
// RecipeDraft to the validator.

use crate::entities::RecipeImage;
use crate::error::{CatalogError, Result};
use crate::parser::{normalize_ingredients, normalize_steps, IngredientInput, StepInput};
use crate::schema::RecipeDraft;
use serde::de::DeserializeOwned;
use tracing::debug;

// ============================================================================
// SUBMISSION
// ============================================================================

/// Raw create/update payload, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeSubmission {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub prep_time: Option<String>,
    pub servings: Option<String>,
    pub difficulty: Option<String>,
    pub categories: Option<String>,
    pub image: Option<RecipeImage>,
    /// Set by the `removeImage=true` sentinel (update only)
    pub remove_image: bool,
}

impl RecipeSubmission {
    /// Collect text fields by wire name. Unknown names are ignored; a
    /// repeated name keeps its last value.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = RecipeSubmission::default();
        for (name, value) in fields {
            submission.set_field(name.as_ref(), value.into());
        }
        submission
    }

    /// Assign one text field. Returns false for names that are not part of
    /// the bundle.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "title" => self.title = Some(value),
            "ingredients" => self.ingredients = Some(value),
            "steps" => self.steps = Some(value),
            "prepTime" => self.prep_time = Some(value),
            "servings" => self.servings = Some(value),
            "difficulty" => self.difficulty = Some(value),
            "categories" => self.categories = Some(value),
            "removeImage" => self.remove_image = value == "true",
            _ => {
                debug!(field = name, "ignoring unknown submission field");
                return false;
            }
        }
        true
    }

    pub fn with_image(mut self, image: RecipeImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Build the draft for a new recipe.
    ///
    /// Missing or empty array fields count as `[]`, which the validator then
    /// rejects with a field error.
    pub fn into_draft(self) -> Result<RecipeDraft> {
        let ingredients: Vec<IngredientInput> =
            decode_array("ingredients", non_empty(self.ingredients.as_deref()).unwrap_or("[]"))?;
        let steps: Vec<StepInput> =
            decode_array("steps", non_empty(self.steps.as_deref()).unwrap_or("[]"))?;
        let categories: Vec<String> =
            decode_array("categories", non_empty(self.categories.as_deref()).unwrap_or("[]"))?;

        Ok(RecipeDraft {
            title: self.title,
            ingredients: normalize_ingredients(ingredients),
            steps: normalize_steps(steps),
            prep_time: self.prep_time.as_deref().and_then(parse_number),
            servings: self.servings.as_deref().and_then(parse_number),
            difficulty: self.difficulty,
            categories,
            image: self.image,
        })
    }

    /// Overlay this submission onto an existing recipe's draft.
    ///
    /// Scalars are replaced whenever present. Array fields are replaced
    /// wholesale when present and non-empty, never merged. All arrays are
    /// decoded before anything is touched, so a malformed field leaves the
    /// draft unchanged.
    pub fn apply_to(self, draft: &mut RecipeDraft) -> Result<()> {
        let ingredients = non_empty(self.ingredients.as_deref())
            .map(|raw| decode_array::<IngredientInput>("ingredients", raw))
            .transpose()?;
        let steps = non_empty(self.steps.as_deref())
            .map(|raw| decode_array::<StepInput>("steps", raw))
            .transpose()?;
        let categories = non_empty(self.categories.as_deref())
            .map(|raw| decode_array::<String>("categories", raw))
            .transpose()?;

        if let Some(title) = self.title {
            draft.title = Some(title);
        }
        if let Some(prep_time) = self.prep_time {
            draft.prep_time = parse_number(&prep_time);
        }
        if let Some(servings) = self.servings {
            draft.servings = parse_number(&servings);
        }
        if let Some(difficulty) = self.difficulty {
            draft.difficulty = Some(difficulty);
        }

        if let Some(ingredients) = ingredients {
            draft.ingredients = normalize_ingredients(ingredients);
        }
        if let Some(steps) = steps {
            draft.steps = normalize_steps(steps);
        }
        if let Some(categories) = categories {
            draft.categories = categories;
        }

        if let Some(image) = self.image {
            draft.image = Some(image);
        } else if self.remove_image {
            draft.image = None;
        }

        Ok(())
    }
}

// ============================================================================
// FIELD DECODING
// ============================================================================

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn decode_array<T: DeserializeOwned>(field: &str, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| {
        debug!(field, error = %e, "malformed array field");
        CatalogError::malformed(field)
    })
}

/// Blank → missing; unreadable → NaN (reported as "must be a number").
fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse().unwrap_or(f64::NAN))
}

// ============================================================================
// TESTS
// ============================================================================
