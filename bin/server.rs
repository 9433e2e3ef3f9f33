// Recipe Catalog - Web Server

use anyhow::{Context, Result};
use recipe_catalog::server::{create_app, AppState, UploadPolicy};
use recipe_catalog::{Config, RecipeStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recipe_catalog=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store = RecipeStore::open(&config.database_path, config.taxonomy.clone())
        .with_context(|| format!("Failed to open database at {}", config.database_path.display()))?;
    info!(recipes = store.count()?, categories = config.taxonomy.len(), "store ready");

    let state = AppState::new(store, UploadPolicy::new(config.max_image_bytes));
    let app = create_app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, static_dir = %config.static_dir.display(), "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
}
