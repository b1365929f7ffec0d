/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables: the PostgreSQL document store and the fast store used for
 * rate limiting and plan caching.
 *
 * # Configuration Sources
 *
 * - `DATABASE_URL` - PostgreSQL connection string (required)
 * - `REDIS_URL` - fast-store connection string; when unset the server
 *   runs on the in-memory backend, which is only correct for a single
 *   process
 * - `SERVER_PORT` - listen port, default 3000
 * - `JWT_SECRET` - token verification secret
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::{FastStore, MemoryStore, RedisStore};

/// Load and initialize the document store connection pool
///
/// Connects to `DATABASE_URL` and runs pending migrations. The server
/// cannot serve documents without its store, so failures here abort
/// startup.
pub async fn load_database() -> Result<PgPool, sqlx::Error> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        tracing::error!("DATABASE_URL not set");
        sqlx::Error::Configuration("DATABASE_URL not set".into())
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {e:?}");
        sqlx::Error::Migrate(Box::new(e))
    })?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Load and initialize the fast store
///
/// With `REDIS_URL` set, connects the Redis backend at startup; the
/// connection manager reconnects on its own afterwards and command
/// failures fail open in the rate limiter. Without it, the in-memory
/// backend keeps local development working with a warning, since an
/// in-memory store cannot coordinate limits across processes.
pub async fn load_fast_store() -> Result<Arc<dyn FastStore>, crate::cache::FastStoreError> {
    match std::env::var("REDIS_URL") {
        Ok(url) => {
            tracing::info!("Connecting to fast store...");
            let store = RedisStore::connect(&url).await?;
            tracing::info!("Fast store connected");
            Ok(Arc::new(store))
        }
        Err(_) => {
            tracing::warn!(
                "REDIS_URL not set; using the in-memory fast store (single process only)"
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Listen port from `SERVER_PORT`, default 3000.
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000)
}
