/**
 * Router Configuration
 *
 * Combines the API routes with the static file service for uploaded
 * attachments and the shared layers.
 *
 * # Layers
 *
 * - `TraceLayer` - request/response spans through `tracing`
 * - `CorsLayer::permissive` - the mobile and web clients run on other origins
 * - `DefaultBodyLimit` - raised for image uploads
 */

use axum::{extract::DefaultBodyLimit, http::StatusCode, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::messaging::uploads::PUBLIC_PREFIX;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Largest accepted request body (image uploads included)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the Axum router with all routes configured
///
/// 1. **API Routes**: registration, login, friends, messages
/// 2. **Static Files**: `/files/*` from the upload directory
/// 3. **Fallback Handler**: JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new(), &app_state);

    let router = router.nest_service(
        &format!("/{PUBLIC_PREFIX}"),
        ServeDir::new(app_state.uploads.dir()),
    );

    let router = router.fallback(|| async {
        BackendError::handler(StatusCode::NOT_FOUND, "Route not found")
    });

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(app_state)
}
