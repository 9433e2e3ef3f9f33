use crate::entities::{Difficulty, Ingredient, Recipe, RecipeImage, RecipeSummary, Step};
use crate::filter::{RecipeFilter, SortMode};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Recipes Table
    // ingredients / steps / categories are JSON arrays, image is the raw blob
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            ingredients TEXT NOT NULL,
            steps TEXT NOT NULL,
            prep_time REAL NOT NULL,
            servings INTEGER NOT NULL,
            difficulty TEXT NOT NULL,
            categories TEXT NOT NULL,
            image BLOB,
            image_content_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK ((image IS NULL) = (image_content_type IS NULL))
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_recipes_title ON recipes(title)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_recipes_difficulty ON recipes(difficulty)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_recipes_updated_at ON recipes(updated_at)",
        [],
    )?;

    Ok(())
}

// Fixed-width UTC text so lexical order == chronological order.
fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_json<T: Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn difficulty_column(row: &Row, idx: usize) -> rusqlite::Result<Difficulty> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn image_columns(row: &Row, data_idx: usize, type_idx: usize) -> rusqlite::Result<Option<RecipeImage>> {
    let data: Option<Vec<u8>> = row.get(data_idx)?;
    let content_type: Option<String> = row.get(type_idx)?;

    Ok(match (data, content_type) {
        (Some(data), Some(content_type)) => Some(RecipeImage { data, content_type }),
        _ => None,
    })
}

pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recipes (
            id, title, ingredients, steps, prep_time, servings, difficulty,
            categories, image, image_content_type, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            recipe.id,
            recipe.title,
            to_json(&recipe.ingredients)?,
            to_json(&recipe.steps)?,
            recipe.prep_time,
            recipe.servings,
            recipe.difficulty.as_str(),
            to_json(&recipe.categories)?,
            recipe.image.as_ref().map(|i| &i.data),
            recipe.image.as_ref().map(|i| &i.content_type),
            timestamp_to_sql(&recipe.created_at),
            timestamp_to_sql(&recipe.updated_at),
        ],
    )?;

    Ok(())
}

/// Overwrite every stored field of an existing recipe.
/// Returns false if no row has this id.
pub fn update_recipe(conn: &Connection, recipe: &Recipe) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE recipes
         SET title = ?2,
             ingredients = ?3,
             steps = ?4,
             prep_time = ?5,
             servings = ?6,
             difficulty = ?7,
             categories = ?8,
             image = ?9,
             image_content_type = ?10,
             updated_at = ?11
         WHERE id = ?1",
        params![
            recipe.id,
            recipe.title,
            to_json(&recipe.ingredients)?,
            to_json(&recipe.steps)?,
            recipe.prep_time,
            recipe.servings,
            recipe.difficulty.as_str(),
            to_json(&recipe.categories)?,
            recipe.image.as_ref().map(|i| &i.data),
            recipe.image.as_ref().map(|i| &i.content_type),
            timestamp_to_sql(&recipe.updated_at),
        ],
    )?;

    Ok(changed > 0)
}

pub fn get_recipe(conn: &Connection, id: &str) -> rusqlite::Result<Option<Recipe>> {
    conn.query_row(
        "SELECT id, title, ingredients, steps, prep_time, servings, difficulty,
                categories, image, image_content_type, created_at, updated_at
         FROM recipes
         WHERE id = ?1",
        [id],
        |row| {
            let ingredients: Vec<Ingredient> = json_column(row, 2)?;
            let steps: Vec<Step> = json_column(row, 3)?;

            Ok(Recipe {
                id: row.get(0)?,
                title: row.get(1)?,
                ingredients,
                steps,
                prep_time: row.get(4)?,
                servings: row.get(5)?,
                difficulty: difficulty_column(row, 6)?,
                categories: json_column(row, 7)?,
                image: image_columns(row, 8, 9)?,
                created_at: timestamp_column(row, 10)?,
                updated_at: timestamp_column(row, 11)?,
            })
        },
    )
    .optional()
}

/// Hard delete. Returns false if no row had this id.
pub fn delete_recipe(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let deleted = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

/// Summaries (no ingredients/steps) matching the filter, in the filter's sort order.
///
/// Difficulty, categories and ordering run in SQL. The title search runs on
/// the fetched rows so that case folding is Unicode-aware.
pub fn list_recipes(conn: &Connection, filter: &RecipeFilter) -> rusqlite::Result<Vec<RecipeSummary>> {
    let mut sql = String::from(
        "SELECT id, title, prep_time, servings, difficulty, categories,
                image, image_content_type, created_at, updated_at
         FROM recipes
         WHERE 1 = 1",
    );
    let mut values: Vec<String> = Vec::new();

    if let Some(difficulty) = &filter.difficulty {
        values.push(difficulty.clone());
        sql.push_str(&format!(" AND difficulty = ?{}", values.len()));
    }

    if !filter.categories.is_empty() {
        let mut placeholders = Vec::with_capacity(filter.categories.len());
        for category in &filter.categories {
            values.push(category.clone());
            placeholders.push(format!("?{}", values.len()));
        }
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM json_each(recipes.categories) WHERE json_each.value IN ({}))",
            placeholders.join(", ")
        ));
    }

    sql.push_str(match filter.sort {
        SortMode::Newest => " ORDER BY updated_at DESC, rowid DESC",
        SortMode::Alphabetical => " ORDER BY title ASC",
    });

    let mut stmt = conn.prepare(&sql)?;
    let summaries = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(RecipeSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                prep_time: row.get(2)?,
                servings: row.get(3)?,
                difficulty: difficulty_column(row, 4)?,
                categories: json_column(row, 5)?,
                image: image_columns(row, 6, 7)?,
                created_at: timestamp_column(row, 8)?,
                updated_at: timestamp_column(row, 9)?,
            })
        })?
        .filter(|result| match result {
            Ok(summary) => filter.matches_title(&summary.title),
            Err(_) => true,
        })
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(summaries)
}

pub fn count_recipes(conn: &Connection) -> rusqlite::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;

    Ok(count)
}
