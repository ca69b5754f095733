//! Messaging Module
//!
//! Wire types for the REST API:
//!
//! - `UserProfile` / `UserDetails` - Public views of a user record
//! - `SendFriendRequestRequest`, `AcceptFriendRequestRequest` - Friend workflow payloads
//! - `ChatMessage`, `MessageType`, `MessageView` - Chat messages
//!
//! JSON field names are camelCase.
//!
//! # Usage
//!
//! ```rust
//! use confab::shared::messaging::{UserProfile, ChatMessage, MessageType};
//! ```

pub mod profile;
pub mod friend_request;
pub mod message;

// Re-export all types
pub use profile::{UserProfile, UserDetails};
pub use friend_request::{
    SendFriendRequestRequest, SendFriendRequestResponse, AcceptFriendRequestRequest,
    PairRequest, StatusMessage,
};
pub use message::{
    ChatMessage, MessageType, MessageView, SenderSummary, DeleteMessagesRequest,
    DeleteMessagesResponse,
};
