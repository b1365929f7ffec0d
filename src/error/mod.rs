//! Server Error Module
//!
//! This module defines the error types used across the server.
//! These errors are used in HTTP handlers and the realtime gateway and
//! can be converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Categories
//!
//! - Authentication errors (missing, invalid, or incomplete tokens) are
//!   fatal to the request or connection that raised them.
//! - Permission errors are non-fatal and only ever reported to the
//!   offending caller.
//! - Dependency errors (document store, fast store) surface as generic
//!   5xx responses, except inside the rate limiter which fails open.
//! - Not-found errors map to 404.
//!
//! # HTTP Response Conversion
//!
//! All errors implement `IntoResponse` from Axum, allowing them to be
//! returned directly from handlers. The error is converted to an
//! appropriate HTTP status code and JSON response body.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::AppError;
