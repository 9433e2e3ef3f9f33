// 🍲 Recipe Entity - root record of the catalog
//
// A Recipe owns its ingredients and steps as embedded value objects.
// Identity is a UUID generated at create time; everything else is a value
// that can be replaced by an update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// DIFFICULTY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Exact, case-sensitive match against the three levels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

// ============================================================================
// VALUE OBJECTS
// ============================================================================

/// One line of a recipe's ingredient list.
///
/// `text` is always the source of truth. The structured fields are a
/// best-effort reading of it and are frequently absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Ingredient {
    /// Ingredient with only its raw text
    pub fn from_text(text: impl Into<String>) -> Self {
        Ingredient {
            text: text.into(),
            quantity: None,
            unit: None,
            name: None,
        }
    }

    pub fn is_structured(&self) -> bool {
        self.quantity.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_number: u32,
    pub description: String,
}

/// Uploaded picture of the dish. Bytes and MIME type travel together, so a
/// recipe either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeImage {
    #[serde(rename = "image", with = "image_base64")]
    pub data: Vec<u8>,

    #[serde(rename = "imageContentType")]
    pub content_type: String,
}

impl RecipeImage {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        RecipeImage {
            data,
            content_type: content_type.into(),
        }
    }
}

// ============================================================================
// RECIPE ENTITY
// ============================================================================

/// Full recipe record (detail projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable identity (UUID v4)
    pub id: String,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub prep_time: f64,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,

    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub image: Option<RecipeImage>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            prep_time: self.prep_time,
            servings: self.servings,
            difficulty: self.difficulty,
            categories: self.categories.clone(),
            image: self.image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// List projection: a recipe without its ingredients and steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub prep_time: f64,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,

    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub image: Option<RecipeImage>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Images cross the JSON boundary as standard base64 text, never raw bytes.
mod image_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
