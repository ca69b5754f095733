/**
 * Authentication Middleware
 *
 * Protects every route except registration and login. The middleware reads
 * the `Authorization: Bearer <token>` header, verifies the token, checks that
 * the user still exists, and attaches an `AuthenticatedUser` to the request
 * extensions for handlers to extract.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::{bearer_token, AuthError};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    /// Fail with 403 unless the caller is `user_id`
    pub fn ensure_is(&self, user_id: Uuid) -> Result<(), BackendError> {
        if self.user_id != user_id {
            tracing::warn!(caller = %self.user_id, acting_for = %user_id, "Caller acting for another user");
            return Err(BackendError::forbidden("Cannot act on behalf of another user"));
        }
        Ok(())
    }

    /// Fail with 403 unless the caller is one of `a` and `b`
    pub fn ensure_one_of(&self, a: Uuid, b: Uuid) -> Result<(), BackendError> {
        if self.user_id != a && self.user_id != b {
            return Err(BackendError::forbidden("Caller is not part of this pair"));
        }
        Ok(())
    }
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the token is missing, invalid, expired, or
/// belongs to a user that no longer exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            AuthError::MissingToken
        })?;

    let token = bearer_token(header)?;
    let user_id = app_state.tokens.user_id_from_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        e
    })?;

    if app_state.users.find_by_id(user_id).await?.is_none() {
        tracing::warn!(%user_id, "Token for unknown user");
        return Err(AuthError::UnknownUser.into());
    }

    request.extensions_mut().insert(AuthenticatedUser { user_id });
    Ok(next.run(request).await)
}
