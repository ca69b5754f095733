/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler:
 * - the user and message stores (trait objects, in-memory or PostgreSQL)
 * - the relationship manager built over the user store
 * - the upload store for image attachments
 * - the session token issuer
 *
 * The `FromRef` implementations let handlers extract only the part they
 * need, following Axum's recommended pattern for state management.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::messaging::db::{MemoryMessageStore, MessageStore};
use crate::backend::messaging::uploads::UploadStore;
use crate::backend::relationships::RelationshipManager;
use crate::backend::store::{MemoryUserStore, UserStore};
use crate::shared::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// User records
    pub users: Arc<dyn UserStore>,
    /// Chat messages
    pub messages: Arc<dyn MessageStore>,
    /// Friend-request state machine over `users`
    pub relationships: Arc<RelationshipManager>,
    /// Attachment storage
    pub uploads: Arc<UploadStore>,
    /// Session token issuer
    pub tokens: Arc<TokenIssuer>,
    /// bcrypt work factor for new passwords
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Assemble the state around the given stores
    pub fn new(
        config: &ServerConfig,
        users: Arc<dyn UserStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        let relationships = RelationshipManager::new(users.clone())
            .with_compensation(config.compensate_partial_failures);
        Self {
            users,
            messages,
            relationships: Arc::new(relationships),
            uploads: Arc::new(UploadStore::new(config.upload_dir.clone())),
            tokens: Arc::new(TokenIssuer::new(config.jwt_secret.clone(), config.token_ttl_secs)),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// State backed by fresh in-memory stores
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryMessageStore::new()),
        )
    }
}

impl FromRef<AppState> for Arc<RelationshipManager> {
    fn from_ref(state: &AppState) -> Self {
        state.relationships.clone()
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
