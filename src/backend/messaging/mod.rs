//! Messaging Module
//!
//! Direct messages between users.
//!
//! - **`db`** - Message storage (in-memory and PostgreSQL)
//! - **`uploads`** - Image attachment files
//! - **`handlers`** - HTTP handlers for sending, listing, and deleting

pub mod db;
pub mod handlers;
pub mod uploads;

pub use db::{MemoryMessageStore, MessageStore, PgMessageStore};
pub use uploads::UploadStore;
