//! Authentication Handlers Module
//!
//! # Handlers
//!
//! - **`register`** - POST /register - User registration
//! - **`login`** - POST /login - User authentication
//! - **`list_users`** - GET /users/{userId} - Everyone except the given user
//! - **`get_user`** - GET /user/{userId} - One user with relationship ids

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Profile handlers
pub mod profile;

pub use types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

pub use login::login;
pub use profile::{get_user, list_users};
pub use register::register;
