/**
 * Authentication
 *
 * Token verification for the HTTP boundary and the realtime gateway.
 * Token issuance belongs to the identity provider; the helper here that
 * mints tokens exists for development and tests.
 */

pub mod tokens;

pub use tokens::{create_token, verify_identity, Claims};
