/**
 * Server Initialization
 *
 * This module handles initialization of the Axum application:
 * connecting the document store, connecting the fast store, building
 * the shared state, and wiring the router.
 */

use axum::Router;

use crate::routes::router::create_router;
use crate::server::config::{load_database, load_fast_store};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Initialization Steps
///
/// 1. Connect the document store and run migrations
/// 2. Connect the fast store (Redis, or in-memory for a single process)
/// 3. Build `AppState` and the router
///
/// Store connections are established here, at process start, and live
/// for the process lifetime.
pub async fn create_app() -> Result<Router, Box<dyn std::error::Error>> {
    tracing::info!("Initializing sketchsync server");

    let db_pool = load_database().await?;
    let fast_store = load_fast_store().await?;

    let app_state = AppState::new(db_pool, fast_store);
    tracing::info!("Application state initialized");

    Ok(create_router(app_state))
}
