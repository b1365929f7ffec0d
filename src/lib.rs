//! Sketchsync - Main Library
//!
//! Sketchsync is the backend for a collaborative canvas application:
//! users authenticate with bearer tokens, share documents with
//! per-collaborator access levels, edit them together over an
//! authenticated WebSocket gateway, and are admitted per request by a
//! plan-aware sliding-window rate limiter backed by a shared fast
//! store.
//!
//! # Module Structure
//!
//! - **`cache`** - the shared fast store (Redis in deployment,
//!   in-memory for a single process) behind one small trait
//! - **`plans`** - subscription tiers and identity-to-plan resolution
//! - **`rate_limit`** - the sliding-window limiter over the fast store
//! - **`auth`** / **`middleware`** - token verification and the HTTP
//!   middleware chain (authenticate, then rate limit)
//! - **`documents`** - document records, the permission model, and the
//!   explicit save/share endpoints
//! - **`collab`** - realtime sessions, rooms, and the WebSocket gateway
//! - **`server`** / **`routes`** - configuration, shared state, router
//!   assembly

pub mod auth;
pub mod cache;
pub mod collab;
pub mod documents;
pub mod error;
pub mod middleware;
pub mod plans;
pub mod rate_limit;
pub mod routes;
pub mod server;
