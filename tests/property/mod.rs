//! Property-based tests

pub mod limiter_proptest;
