/**
 * Login Handler
 *
 * POST /login
 *
 * # Authentication Process
 *
 * 1. Reject missing fields with 400
 * 2. Look up the user by normalized email
 * 3. Verify the password using bcrypt
 * 4. Issue a JWT for the user id
 *
 * Unknown users and wrong passwords both return 401 with the same message.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::sessions::AuthError;
use crate::backend::auth::users::{normalize_email, verify_password};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::error::require_non_empty;

/// Login handler
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, BackendError> {
    let Json(request) = payload?;
    require_non_empty("email", &request.email)?;
    require_non_empty("password", &request.password)?;

    let email = normalize_email(&request.email);
    tracing::info!("Login request for: {}", email);

    let user = app_state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", email);
            AuthError::InvalidCredentials
        })?;

    let valid = verify_password(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        AuthError::Hash(e)
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = app_state.tokens.create_token(user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
