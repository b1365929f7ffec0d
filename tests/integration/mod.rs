//! Integration tests

pub mod gateway_test;
pub mod rooms_test;
