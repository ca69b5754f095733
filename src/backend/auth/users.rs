/**
 * User Model
 *
 * This module defines the persisted user record, its public projections, and
 * the registration helpers (validation and password hashing).
 */

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::RelationField;
use crate::shared::error::{require_non_empty, SharedError};
use crate::shared::messaging::{UserDetails, UserProfile};

/// User record as stored
///
/// The three relationship arrays keep insertion order and never hold the
/// same id twice.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (unique, stored lowercase)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Optional avatar reference
    pub image: Option<String>,
    /// Users whose requests this user received and has not accepted
    pub friend_requests: Vec<Uuid>,
    /// Users this user sent requests to that are still pending
    pub sent_friend_requests: Vec<Uuid>,
    /// Confirmed friends
    pub friends: Vec<Uuid>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record with empty relationship arrays
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            image: new_user.image,
            friend_requests: Vec::new(),
            sent_friend_requests: Vec::new(),
            friends: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// `{id, name, email, image}` projection
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
        }
    }

    /// Profile plus relationship arrays, without the password hash
    pub fn details(&self) -> UserDetails {
        UserDetails {
            profile: self.profile(),
            friend_requests: self.friend_requests.clone(),
            sent_friend_requests: self.sent_friend_requests.clone(),
            friends: self.friends.clone(),
        }
    }

    pub fn relation(&self, field: RelationField) -> &[Uuid] {
        match field {
            RelationField::FriendRequests => &self.friend_requests,
            RelationField::SentFriendRequests => &self.sent_friend_requests,
            RelationField::Friends => &self.friends,
        }
    }

    pub fn relation_mut(&mut self, field: RelationField) -> &mut Vec<Uuid> {
        match field {
            RelationField::FriendRequests => &mut self.friend_requests,
            RelationField::SentFriendRequests => &mut self.sent_friend_requests,
            RelationField::Friends => &mut self.friends,
        }
    }

    /// Whether `other` appears in the given relationship array
    pub fn has_relation(&self, field: RelationField, other: Uuid) -> bool {
        self.relation(field).contains(&other)
    }
}

/// Fields supplied at registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
}

/// Lowercase and trim an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate registration input
///
/// The name and password must be non-blank and the email must look like an
/// address (`local@domain`).
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), SharedError> {
    require_non_empty("name", name)?;
    require_non_empty("password", password)?;
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(SharedError::validation("email", "Email must look like local@domain")),
    }
}

/// Hash a password with bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a password against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, password_hash)
}
