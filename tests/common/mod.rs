//! Common test utilities and helpers
//!
//! - Fault-injecting user store for partial-failure tests
//! - Users and managers over in-memory stores
//! - An `axum-test` server with registration/login helpers

#![allow(dead_code)]

pub mod app;
pub mod flaky_store;
pub mod fixtures;

pub use app::*;
pub use fixtures::*;
pub use flaky_store::*;
