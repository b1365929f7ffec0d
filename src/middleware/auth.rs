/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the verified identity to handlers.
 */

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::verify_identity;
use crate::error::AppError;

/// Authenticated user data extracted from the JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// User ID parsed from the identity
    pub user_id: Uuid,
    /// Opaque identity string (the token's subject claim)
    pub identity: String,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token
/// 3. Attaches the verified identity to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("[Auth] missing Authorization header");
            AppError::MissingToken
        })?;

    // Extract token (format: "Bearer <token>")
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("[Auth] malformed Authorization header");
        AppError::MissingToken
    })?;

    let identity = verify_identity(token)?;

    let user_id = Uuid::parse_str(&identity).map_err(|_| {
        tracing::warn!("[Auth] token subject is not a user id");
        AppError::InvalidToken
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id, identity });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Handlers take this as a parameter to receive the identity bound by
/// `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                AppError::MissingToken
            })?;

        Ok(AuthUser(user))
    }
}
