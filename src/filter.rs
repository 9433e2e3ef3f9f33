// 🔎 Recipe Filters - list query parameters → filter
//
// Absent or empty parameters mean "no constraint" on that dimension.

use serde::Deserialize;

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

/// Query string of the list endpoint, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// Comma-joined category labels
    pub categories: Option<String>,
    pub difficulty: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Most recently updated first
    #[default]
    Newest,
    /// Title ascending
    Alphabetical,
}

impl SortMode {
    /// Unknown values fall back to `Newest`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("alphabetical") => SortMode::Alphabetical,
            _ => SortMode::Newest,
        }
    }
}

// ============================================================================
// FILTER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Lowercased title substring
    pub search: Option<String>,
    /// Match recipes carrying ANY of these labels
    pub categories: Vec<String>,
    pub difficulty: Option<String>,
    pub sort: SortMode,
}

impl RecipeFilter {
    pub fn from_params(params: &ListParams) -> Self {
        let search = params
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let categories = params
            .categories
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let difficulty = params
            .difficulty
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        RecipeFilter {
            search,
            categories,
            difficulty,
            sort: SortMode::from_param(params.sort.as_deref()),
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_lowercase()).filter(|s| !s.is_empty());
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Case-insensitive substring match against the title only.
    pub fn matches_title(&self, title: &str) -> bool {
        match &self.search {
            Some(needle) => title.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
