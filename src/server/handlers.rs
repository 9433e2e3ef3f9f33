use super::{upload, ApiError, AppState};
use crate::entities::{Recipe, RecipeSummary};
use crate::filter::{ListParams, RecipeFilter};
use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK", "version": crate::VERSION }))
}

/// GET /api/recipes - Summaries matching the query, newest first by default
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let filter = RecipeFilter::from_params(&params);
    let summaries = state.store()?.list(&filter)?;
    Ok(Json(summaries))
}

/// GET /api/recipes/:id - Full recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.store()?.get(&id)?;
    Ok(Json(recipe))
}

/// POST /api/recipes - Create from a form (optionally with an image)
pub async fn create_recipe(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let submission = upload::read_submission(request, &state.upload).await?;
    let recipe = state.store()?.create(submission)?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/recipes/:id - Partial update
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Recipe>, ApiError> {
    let submission = upload::read_submission(request, &state.upload).await?;
    let recipe = state.store()?.update(&id, submission)?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store()?.delete(&id)?;
    Ok(Json(json!({ "message": "Recipe deleted successfully" })))
}

/// GET /api/categories - The category taxonomy, in order
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.store()?.taxonomy().names().to_vec();
    Ok(Json(names))
}
