//! Authentication Module
//!
//! User records, password hashing, session tokens, and the HTTP handlers for
//! registration, login, and profile lookup.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User record and password helpers
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     └── profile.rs  - User listing and lookup handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Password hashes are never serialized
//! - Invalid credentials return 401 (no information leakage)

/// User record and password helpers
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_user, list_users, login, register};
pub use sessions::{AuthError, TokenIssuer};
pub use users::{NewUser, User};
