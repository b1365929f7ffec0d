/**
 * Plan Resolution
 *
 * Resolves a user identity to a subscription plan, consulting the fast
 * store as a cache in front of the authoritative user record.
 *
 * # Failure Policy
 *
 * Cache failures on either the read or the write side are logged and
 * skipped; the resolver still answers from the database. A database
 * failure propagates to the caller, where the rate-limit middleware
 * fails open and everything else answers with a generic 5xx.
 */

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::FastStore;
use crate::error::AppError;
use crate::plans::Plan;

/// How long a resolved plan stays cached before the authoritative
/// record is consulted again.
const PLAN_CACHE_TTL: Duration = Duration::from_secs(300);

/// Resolves identities to plans through the cache-then-database path.
#[derive(Clone)]
pub struct PlanResolver {
    store: Arc<dyn FastStore>,
    pool: PgPool,
}

impl PlanResolver {
    pub fn new(store: Arc<dyn FastStore>, pool: PgPool) -> Self {
        Self { store, pool }
    }

    /// Cache key for one identity's plan.
    fn cache_key(identity: &str) -> String {
        format!("plan:{identity}")
    }

    /// Resolve the plan for `identity`.
    ///
    /// Checks the cache first; on a miss, reads the user record
    /// (absent user or absent plan field resolves to the free tier),
    /// then repopulates the cache. The authoritative record is never
    /// mutated here.
    pub async fn resolve(&self, identity: &str) -> Result<Plan, AppError> {
        let key = Self::cache_key(identity);

        match self.store.get(&key).await {
            Ok(Some(cached)) => {
                if let Some(plan) = Plan::from_name(&cached) {
                    tracing::debug!("[Plans] cache hit for {identity}: {plan}");
                    return Ok(plan);
                }
                tracing::warn!("[Plans] unrecognized cached plan {cached:?} for {identity}");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("[Plans] cache read failed for {identity}: {e}");
            }
        }

        let plan = find_user_plan(&self.pool, identity).await?;

        if let Err(e) = self
            .store
            .set_with_ttl(&key, plan.as_str(), PLAN_CACHE_TTL)
            .await
        {
            tracing::warn!("[Plans] cache write failed for {identity}: {e}");
        }

        Ok(plan)
    }
}

/// Read the authoritative plan from the user record.
///
/// Identities are UUID strings minted by the identity provider; a
/// non-UUID identity cannot match a user row and resolves to free, the
/// same as an absent user.
async fn find_user_plan(pool: &PgPool, identity: &str) -> Result<Plan, AppError> {
    let Ok(user_id) = Uuid::parse_str(identity) else {
        return Ok(Plan::Free);
    };

    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT plan FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row
        .and_then(|(plan,)| plan)
        .and_then(|plan| Plan::from_name(&plan))
        .unwrap_or_default())
}

/// Handle `GET /api/me/plan`: the caller's resolved plan.
pub async fn get_my_plan(
    axum::extract::State(resolver): axum::extract::State<PlanResolver>,
    crate::middleware::AuthUser(user): crate::middleware::AuthUser,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    let plan = resolver.resolve(&user.identity).await?;
    Ok(axum::Json(serde_json::json!({ "plan": plan })))
}
