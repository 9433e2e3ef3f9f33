// 🏷️ Category Taxonomy - fixed set of labels a recipe may carry
//
// The taxonomy is reference data: loaded once at startup, never written by the
// API, and handed to whoever needs it (validator, categories endpoint).
// Tests build their own taxonomies instead of relying on the defaults.

use std::sync::Arc;

/// Labels used when no override is configured.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Snack",
    "Appetizer",
    "Soup",
    "Salad",
    "Side Dish",
    "Beverage",
    "Baking",
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Quick",
];

// ============================================================================
// TAXONOMY
// ============================================================================

/// Ordered, duplicate-free list of allowed category labels.
///
/// Cloning is cheap: all clones share one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    names: Arc<Vec<String>>,
}

impl Taxonomy {
    /// Build a taxonomy from arbitrary labels.
    ///
    /// Labels are trimmed; blanks and repeats are dropped, first occurrence
    /// wins so the listing order follows the input.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || names.iter().any(|n| n == label) {
                continue;
            }
            names.push(label.to_string());
        }

        Taxonomy {
            names: Arc::new(names),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CATEGORIES.iter().copied())
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, label: &str) -> bool {
        self.names.iter().any(|n| n == label)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
