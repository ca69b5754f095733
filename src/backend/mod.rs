//! Backend Module
//!
//! Server-side code for the chat backend.
//!
//! # Module Structure
//!
//! - **`server`** - Server initialization, state and store selection
//! - **`routes`** - Route configuration
//! - **`middleware`** - Bearer token authentication
//! - **`error`** - `BackendError` and its HTTP responses
//! - **`auth`** - Users, passwords, sessions, auth handlers
//! - **`store`** - User store trait and implementations
//! - **`relationships`** - Friend-request state machine
//! - **`messaging`** - Messages and attachments

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Error types and conversions
pub mod error;

/// Authentication
pub mod auth;

/// Request middleware
pub mod middleware;

/// User storage
pub mod store;

/// Friend relationships
pub mod relationships;

/// Messages and uploads
pub mod messaging;
