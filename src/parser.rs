// 🧂 Ingredient & Step Parser
// Turns submitted ingredient lines and step lines into structured values.
//
// Both functions are total: every input produces a value. A line the
// ingredient pattern cannot read simply keeps its raw text.

use crate::entities::{Ingredient, Step};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// "<quantity> <unit> <name>", e.g. "2 cups flour", "1/2 tsp salt", "3.5 oz chicken".
static INGREDIENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9./]+)\s+(\w+)\s+(.+)$").expect("ingredient pattern is valid")
});

// ============================================================================
// INPUT SHAPES
// ============================================================================

/// One element of a submitted `ingredients` array.
///
/// Fresh form input is a plain string; a client re-saving a recipe it fetched
/// earlier sends back the structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientInput {
    Text(String),
    Structured(Ingredient),
}

/// One element of a submitted `steps` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepInput {
    Text(String),
    Structured(StepEntry),
}

/// Structured step as a client may send it; the number is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEntry {
    #[serde(default)]
    pub step_number: Option<u32>,
    pub description: String,
}

impl IngredientInput {
    fn is_blank(&self) -> bool {
        match self {
            IngredientInput::Text(text) => text.trim().is_empty(),
            IngredientInput::Structured(ingredient) => ingredient.text.trim().is_empty(),
        }
    }
}

impl StepInput {
    fn is_blank(&self) -> bool {
        match self {
            StepInput::Text(text) => text.trim().is_empty(),
            StepInput::Structured(entry) => entry.description.trim().is_empty(),
        }
    }
}

// ============================================================================
// INGREDIENTS
// ============================================================================

/// Read quantity, unit and name out of a free-form ingredient line.
///
/// The returned ingredient always carries the trimmed line as `text`. The
/// structured fields are filled together or not at all.
pub fn parse_ingredient(line: &str) -> Ingredient {
    let text = line.trim();
    let mut ingredient = Ingredient::from_text(text);

    let Some(caps) = INGREDIENT_PATTERN.captures(text) else {
        return ingredient;
    };

    if let Some(quantity) = parse_quantity(&caps[1]) {
        ingredient.quantity = Some(quantity);
        ingredient.unit = Some(caps[2].to_string());
        ingredient.name = Some(caps[3].to_string());
    }

    ingredient
}

/// Decimal ("3.5") or simple fraction ("1/2"). Anything else is `None`.
pub fn parse_quantity(token: &str) -> Option<f64> {
    if token.contains('/') {
        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() != 2 {
            return None;
        }
        let numerator: f64 = parts[0].parse().ok()?;
        let denominator: f64 = parts[1].parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    token.parse().ok()
}

/// Parse raw lines; structured ingredients pass through untouched.
pub fn normalize_ingredient(input: IngredientInput) -> Ingredient {
    match input {
        IngredientInput::Text(line) => parse_ingredient(&line),
        IngredientInput::Structured(ingredient) => ingredient,
    }
}

/// Drop blank entries, then normalize the rest in order.
pub fn normalize_ingredients(inputs: Vec<IngredientInput>) -> Vec<Ingredient> {
    inputs
        .into_iter()
        .filter(|input| !input.is_blank())
        .map(normalize_ingredient)
        .collect()
}

// ============================================================================
// STEPS
// ============================================================================

/// Number steps by position.
///
/// Raw strings get `index + 1`. Structured steps keep an explicit non-zero
/// number and fall back to `index + 1` when it is missing or zero. Blank
/// entries are dropped before numbering so positions stay dense.
pub fn normalize_steps(inputs: Vec<StepInput>) -> Vec<Step> {
    inputs
        .into_iter()
        .filter(|input| !input.is_blank())
        .enumerate()
        .map(|(index, input)| {
            let position = index as u32 + 1;
            match input {
                StepInput::Text(description) => Step {
                    step_number: position,
                    description,
                },
                StepInput::Structured(entry) => Step {
                    step_number: entry.step_number.filter(|n| *n != 0).unwrap_or(position),
                    description: entry.description,
                },
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
