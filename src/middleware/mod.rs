/**
 * HTTP Middleware
 *
 * Request middleware applied to the API surface:
 *
 * - `auth` - extracts and verifies the bearer token, binding the
 *   verified identity to the request
 * - `rate_limit` - plan-aware sliding-window admission, running after
 *   authentication
 */

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use rate_limit::rate_limit_middleware;
