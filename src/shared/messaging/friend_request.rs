//! Friend Request Payloads
//!
//! Request and response bodies for the friend-request endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /friend-request`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestRequest {
    /// The user sending the request
    pub current_user_id: Uuid,
    /// The user receiving the request
    pub selected_user_id: Uuid,
}

/// Response after sending a friend request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestResponse {
    pub message: String,
    /// `sent` or `already_pending`
    pub outcome: String,
}

/// Body of `POST /friend-request/accept`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptFriendRequestRequest {
    /// The user who sent the pending request
    pub sender_id: Uuid,
    /// The user accepting it
    #[serde(alias = "recepientId")]
    pub recipient_id: Uuid,
}

/// Body of `POST /relationships/repair`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequest {
    pub user_id: Uuid,
    pub other_id: Uuid,
}

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
