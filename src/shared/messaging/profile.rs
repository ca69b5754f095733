//! User profile projections
//!
//! Users are never serialized with their password hash. The API returns one
//! of these two projections instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public projection of a user: `{id, name, email, image}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

/// A profile plus the user's relationship arrays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub friend_requests: Vec<Uuid>,
    pub sent_friend_requests: Vec<Uuid>,
    pub friends: Vec<Uuid>,
}
