/**
 * JWT Verification
 *
 * This module validates bearer tokens presented at the HTTP boundary
 * and the realtime handshake, and extracts the verified identity from
 * the subject claim.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Verified user identity
    #[serde(default)]
    pub sub: String,
    /// Email (optional, informational only)
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET ({err}), using development default");
        "your-secret-key-change-in-production".to_string()
    })
}

/// Create a JWT token for a user
///
/// Issuance is the identity provider's job in deployment; this helper
/// backs local development and the test suite.
///
/// # Arguments
/// * `identity` - Verified user identity placed in the subject claim
///
/// # Returns
/// JWT token string
pub fn create_token(identity: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Token expires in 30 days
    let exp = now + (30 * 24 * 60 * 60);

    let claims = Claims {
        sub: identity.to_string(),
        email: None,
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify a token and return the identity it names
///
/// # Errors
///
/// * `AppError::InvalidToken` - signature, expiry, or structure failure
/// * `AppError::IncompleteToken` - the token verified but carries an
///   empty subject claim, so there is no identity to bind
pub fn verify_identity(token: &str) -> Result<String, AppError> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!("[Auth] token verification failed: {e}");
        AppError::InvalidToken
    })?;

    if token_data.claims.sub.is_empty() {
        return Err(AppError::IncompleteToken);
    }

    Ok(token_data.claims.sub)
}
