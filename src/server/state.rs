/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The document store connection pool
 * - The room registry for realtime collaboration
 * - The plan resolver and rate limiter, both backed by the shared
 *   fast store
 *
 * # Thread Safety
 *
 * All fields are designed for concurrent access: the pool and resolver
 * are internally shared, and the room registry guards its indices with
 * a mutex. `AppState` itself is cheap to clone.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::cache::FastStore;
use crate::collab::RoomRegistry;
use crate::plans::PlanResolver;
use crate::rate_limit::SlidingWindowLimiter;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Document store connection pool
    pub db_pool: PgPool,
    /// Realtime room membership and broadcast
    pub rooms: Arc<RoomRegistry>,
    /// Identity -> plan resolution (cache in front of the user record)
    pub plans: PlanResolver,
    /// Plan-aware sliding-window rate limiter
    pub limiter: SlidingWindowLimiter,
}

impl AppState {
    /// Build the state from its two external collaborators.
    pub fn new(db_pool: PgPool, fast_store: Arc<dyn FastStore>) -> Self {
        Self {
            plans: PlanResolver::new(fast_store.clone(), db_pool.clone()),
            limiter: SlidingWindowLimiter::new(fast_store),
            rooms: Arc::new(RoomRegistry::new()),
            db_pool,
        }
    }
}

/// Allow handlers to extract the pool directly from `AppState`.
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the room registry directly.
impl FromRef<AppState> for Arc<RoomRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

/// Allow handlers to extract the plan resolver directly.
impl FromRef<AppState> for PlanResolver {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.plans.clone()
    }
}

/// Allow handlers to extract the rate limiter directly.
impl FromRef<AppState> for SlidingWindowLimiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.limiter.clone()
    }
}
