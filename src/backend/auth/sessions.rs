/**
 * Session Tokens
 *
 * This module issues and verifies the JWT bearer tokens returned by login.
 * Tokens carry the user id as `sub` and expire after the configured TTL.
 */

use axum::http::StatusCode;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token subject is not a user id")]
    InvalidSubject,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("token user no longer exists")]
    UnknownUser,
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to return to clients
    pub fn client_message(&self) -> String {
        match self {
            AuthError::InvalidToken(_) | AuthError::InvalidSubject | AuthError::UnknownUser => {
                "Invalid or expired token".to_string()
            }
            AuthError::Hash(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Signs and verifies session tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Create a token for a user
    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
        };
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &key, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the user id it was issued for
    pub fn user_id_from_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify_token(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}
