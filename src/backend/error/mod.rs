//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion into HTTP
//! responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Response Format
//!
//! ```json
//! {
//!   "error": "Users are already friends",
//!   "status": 409,
//!   "details": { "...": "..." }
//! }
//! ```
//!
//! `details` is present for relationship conflicts (the pair snapshot) and
//! partial failures (which writes landed, whether they were undone).

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
