//! Middleware Module
//!
//! Request processing middleware.
//!
//! - **`auth`** - Bearer token verification for protected routes

/// Authentication middleware
pub mod auth;

pub use auth::{auth_middleware, AuthenticatedUser};
