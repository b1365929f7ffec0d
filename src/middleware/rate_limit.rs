/**
 * Rate Limit Middleware
 *
 * Plan-aware admission control, applied after authentication. Each
 * request resolves the caller's plan and runs one sliding-window check
 * against the shared fast store.
 *
 * # Failure Policy
 *
 * Any error on the plan-resolution or fast-store path admits the
 * request and logs a warning. A dead cache must never become a full
 * outage; strict enforcement resumes as soon as the dependency
 * recovers. Authorization and validation failures are never swallowed
 * this way: the only errors that fail open are dependency errors
 * reaching this middleware.
 */

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::rate_limit::Decision;
use crate::server::state::AppState;

/// Rate-limiting middleware
///
/// Expects `auth_middleware` to have bound an identity already; a
/// request arriving here without one is rejected outright.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        tracing::warn!("[RateLimit] request reached limiter without an identity");
        return AppError::MissingToken.into_response();
    };
    let identity = user.identity.clone();

    let decision = async {
        let plan = state.plans.resolve(&identity).await?;
        let decision = state.limiter.check_and_record(&identity, plan).await?;
        Ok::<Decision, AppError>(decision)
    }
    .await;

    match decision {
        Ok(Decision::Allowed { .. }) => next.run(request).await,
        Ok(Decision::Rejected { retry_after }) => {
            tracing::info!("[RateLimit] rejecting {identity}");
            too_many_requests(retry_after.as_secs())
        }
        Err(e) => {
            // Fail open: admit the request, keep the failure visible.
            tracing::warn!("[RateLimit] failing open for {identity}: {e}");
            next.run(request).await
        }
    }
}

/// Build the 429 response for a rejected request.
///
/// The body shape matches the error responses elsewhere so clients can
/// parse uniformly, while the 429 status keeps rate-limit rejections
/// distinguishable from generic failures.
fn too_many_requests(retry_after_secs: u64) -> Response {
    let body = serde_json::json!({
        "error": "rate limit exceeded",
        "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
    });

    Response::builder()
        .status(StatusCode::TOO_MANY_REQUESTS)
        .header("Content-Type", "application/json")
        .header("Retry-After", retry_after_secs.to_string())
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| StatusCode::TOO_MANY_REQUESTS.into_response())
}
