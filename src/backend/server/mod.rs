//! Server Module
//!
//! - **`init`** - Server initialization and router creation
//! - **`state`** - Shared application state
//! - **`config`** - Store selection (PostgreSQL or in-memory)

/// Server initialization
pub mod init;

/// Application state
pub mod state;

/// Store selection
pub mod config;

pub use init::{build_app, create_app};
pub use state::AppState;
