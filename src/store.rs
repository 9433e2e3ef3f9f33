// 🗄️ Recipe Store - intake → validation → persistence
//
// Owns the SQLite connection and the validator. Every write runs through the
// full pipeline; reads go straight to the database.

use crate::db;
use crate::entities::{Recipe, RecipeSummary, Taxonomy};
use crate::error::{CatalogError, Result};
use crate::filter::RecipeFilter;
use crate::intake::RecipeSubmission;
use crate::schema::{RecipeDraft, RecipeValidator};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

pub struct RecipeStore {
    conn: Connection,
    validator: RecipeValidator,
}

impl RecipeStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>, taxonomy: Taxonomy) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened recipe database");
        Self::with_connection(conn, taxonomy)
    }

    pub fn open_in_memory(taxonomy: Taxonomy) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, taxonomy)
    }

    pub fn with_connection(conn: Connection, taxonomy: Taxonomy) -> Result<Self> {
        db::setup_database(&conn)?;
        Ok(RecipeStore {
            conn,
            validator: RecipeValidator::new(taxonomy),
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        self.validator.taxonomy()
    }

    // ========================================================================
    // WRITES
    // ========================================================================

    /// Create a recipe from one submission. Nothing is stored unless the
    /// whole submission is valid.
    pub fn create(&self, submission: RecipeSubmission) -> Result<Recipe> {
        let draft = submission.into_draft()?;
        self.create_from_draft(draft)
    }

    pub fn create_from_draft(&self, draft: RecipeDraft) -> Result<Recipe> {
        let fields = self.validator.check(draft)?;

        let created_at = now();
        let recipe = fields.into_recipe(Uuid::new_v4().to_string(), created_at, created_at);
        db::insert_recipe(&self.conn, &recipe)?;

        info!(id = %recipe.id, title = %recipe.title, "recipe created");
        Ok(recipe)
    }

    /// Partial update: only supplied fields change; supplied arrays replace
    /// the stored ones. The merged record is re-validated as a whole.
    pub fn update(&self, id: &str, submission: RecipeSubmission) -> Result<Recipe> {
        let existing = self.get(id)?;
        let id = existing.id.clone();
        let created_at = existing.created_at;

        let mut draft = RecipeDraft::from(existing);
        submission.apply_to(&mut draft)?;
        let fields = self.validator.check(draft)?;

        let recipe = fields.into_recipe(id, created_at, now());
        if !db::update_recipe(&self.conn, &recipe)? {
            // Deleted between the read and the write.
            return Err(CatalogError::NotFound);
        }

        info!(id = %recipe.id, "recipe updated");
        Ok(recipe)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        if !db::delete_recipe(&self.conn, &id)? {
            return Err(CatalogError::NotFound);
        }

        info!(id = %id, "recipe deleted");
        Ok(())
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn get(&self, id: &str) -> Result<Recipe> {
        let id = parse_id(id)?;
        db::get_recipe(&self.conn, &id)?.ok_or(CatalogError::NotFound)
    }

    pub fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>> {
        let summaries = db::list_recipes(&self.conn, filter)?;
        debug!(count = summaries.len(), ?filter, "listed recipes");
        Ok(summaries)
    }

    pub fn count(&self) -> Result<i64> {
        Ok(db::count_recipes(&self.conn)?)
    }
}

/// Current time at the precision the database keeps (microseconds), so a
/// returned record equals the one read back later.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Ids are UUIDs; anything else cannot name a recipe and is reported exactly
/// like an absent one.
fn parse_id(id: &str) -> Result<String> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|_| CatalogError::NotFound)
}

// ============================================================================
// TESTS
// ============================================================================
