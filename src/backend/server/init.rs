/**
 * Server Initialization
 *
 * 1. Select the stores (PostgreSQL or in-memory)
 * 2. Make sure the upload directory exists
 * 3. Build the application state and router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_stores;
use crate::backend::server::state::AppState;
use crate::shared::config::ServerConfig;

/// Create the application router for `config`
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, std::io::Error> {
    tracing::info!("Initializing Confab backend server");

    let stores = load_stores(config).await;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Serving uploads from {}", config.upload_dir.display());

    if !config.compensate_partial_failures {
        tracing::warn!("Compensation disabled: partial relationship writes will be left for repair");
    }

    let app_state = AppState::new(config, stores.users, stores.messages);
    let app = build_app(app_state);
    tracing::info!("Router configured");
    Ok(app)
}

/// Build the router around an existing state
pub fn build_app(app_state: AppState) -> Router<()> {
    create_router(app_state)
}
