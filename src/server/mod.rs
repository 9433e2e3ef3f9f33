// Recipe Catalog - Web Server
// REST API with Axum

pub mod handlers;
pub mod upload;

use crate::error::CatalogError;
use crate::store::RecipeStore;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::error;

pub use upload::UploadPolicy;

/// Request bodies above this are refused before any handler runs.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<RecipeStore>>,
    pub upload: UploadPolicy,
}

impl AppState {
    pub fn new(store: RecipeStore, upload: UploadPolicy) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            upload,
        }
    }

    /// Lock the store for one operation. Never hold the guard across an await.
    pub fn store(&self) -> Result<MutexGuard<'_, RecipeStore>, ApiError> {
        self.store.lock().map_err(|_| ApiError::Internal("recipe store lock poisoned".to_string()))
    }
}

// ============================================================================
// API Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Image rejected by the upload policy
    #[error("{0}")]
    Upload(String),

    /// Body could not be read as a form at all
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Catalog(CatalogError::NotFound) => {
                (StatusCode::NOT_FOUND, json!({ "error": "Recipe not found" }))
            }
            ApiError::Catalog(err) if err.is_client_error() => {
                let details = err.details().unwrap_or_default();
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Validation failed", "details": details }),
                )
            }
            ApiError::Catalog(err) => {
                error!(error = %err, "request failed");
                internal_error()
            }
            ApiError::Upload(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::Rejected { status, message } => (status, json!({ "error": message })),
            ApiError::Internal(message) => {
                error!(error = %message, "request failed");
                internal_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal server error" }),
    )
}

// ============================================================================
// Router
// ============================================================================

/// API routes only.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/recipes",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/api/recipes/:id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/api/categories", get(handlers::list_categories))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Full application: API, the built client when `static_dir` exists, CORS
/// and request tracing.
pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    let mut app = create_router(state);

    if static_dir.is_dir() {
        // Unknown paths get index.html so client-side routes load.
        let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
