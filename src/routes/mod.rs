/**
 * Routes
 *
 * Router assembly for the HTTP and realtime boundaries.
 */

pub mod router;

pub use router::create_router;
