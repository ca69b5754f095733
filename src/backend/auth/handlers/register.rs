/**
 * Registration Handler
 *
 * POST /register
 *
 * 1. Normalize the email and validate the fields
 * 2. Hash the password with bcrypt
 * 3. Insert the user; a taken email is reported as 409 Conflict
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::sessions::AuthError;
use crate::backend::auth::users::{hash_password, normalize_email, validate_registration, NewUser};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Register a new user
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, BackendError> {
    let Json(request) = payload?;
    let email = normalize_email(&request.email);
    let name = request.name.trim().to_string();
    validate_registration(&name, &email, &request.password)?;

    tracing::info!("Registration request for: {}", email);

    let password_hash = hash_password(&request.password, app_state.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AuthError::Hash(e)
    })?;

    let user = app_state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash,
            image: request.image.filter(|image| !image.trim().is_empty()),
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to register user: {}", e);
            e
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.profile(),
    }))
}
