/**
 * Authentication Handler Types
 *
 * Request and response bodies for registration and login. Request fields
 * default to empty so missing fields surface as 400 validation errors rather
 * than JSON rejections.
 */

use serde::{Deserialize, Serialize};

use crate::shared::messaging::UserProfile;

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Plain password, hashed before storage
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Registration response
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
