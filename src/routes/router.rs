/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Groups
 *
 * - `GET /health` - liveness, unauthenticated
 * - `GET /ws` - realtime gateway; authenticates its own handshake
 * - `/api/...` - document and plan endpoints, behind authentication
 *   and then rate limiting
 *
 * # Middleware Order
 *
 * Authentication must run before the rate limiter, because the limiter
 * keys its window on the verified identity. Axum runs the last-added
 * layer first, so the auth layer is added after the rate-limit layer.
 */

use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, routing::post, routing::put, Router};

use crate::collab::gateway::ws_handler;
use crate::documents::handlers::{
    create_document, get_document, save_document, update_document_permissions,
};
use crate::middleware::{auth_middleware, rate_limit_middleware};
use crate::plans::resolver::get_my_plan;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let api = Router::new()
        .route("/api/documents", post(create_document))
        .route(
            "/api/documents/{id}",
            get(get_document).put(save_document),
        )
        .route(
            "/api/documents/{id}/permissions",
            put(update_document_permissions),
        )
        .route("/api/me/plan", get(get_my_plan))
        .layer(from_fn_with_state(app_state.clone(), rate_limit_middleware))
        .layer(from_fn(auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .merge(api)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}
