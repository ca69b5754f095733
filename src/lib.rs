//! Confab - Chat Backend Library
//!
//! Confab is a chat-application backend built on Axum: user registration and
//! login, a friend-request workflow, and message exchange with optional image
//! attachments.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types and configuration shared by every layer
//!   - User profiles, friend request payloads, chat messages
//!   - Validation errors
//!   - Server configuration
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server, routes and middleware
//!   - User and message stores (in-memory and PostgreSQL)
//!   - The relationship manager driving the friend-request state machine
//!   - Authentication with bcrypt and JWT
//!
//! # Usage
//!
//! ```rust,no_run
//! use confab::backend::server::init::create_app;
//! use confab::shared::config::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Relationship Model
//!
//! Friendships are stored as relationship arrays on both user records
//! (`friend_requests`, `sent_friend_requests`, `friends`). Every mutation of
//! a pair of users goes through [`backend::relationships::RelationshipManager`],
//! which serializes work per pair and reports partially applied writes as
//! [`backend::relationships::RelationshipError::PartialFailure`].

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
