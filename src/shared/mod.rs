//! Shared Module
//!
//! Types that cross layer boundaries: the JSON payloads exchanged over the
//! REST API, validation errors, and server configuration. Nothing in here
//! touches a database or the network.

/// Shared error types
pub mod error;

/// Server configuration
pub mod config;

/// Wire types for users, friend requests and messages
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{ServerConfig, ServerConfigBuilder, ConfigError};
