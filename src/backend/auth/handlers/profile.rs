//! Profile lookup handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{UserDetails, UserProfile};

/// GET /users/{userId}: every registered user except `userId`
pub async fn list_users(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let users = app_state.users.list_except(user_id).await?;
    Ok(Json(users.iter().map(|user| user.profile()).collect()))
}

/// GET /user/{userId}: one user with their relationship ids
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserDetails>, BackendError> {
    let user = app_state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| BackendError::handler(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(user.details()))
}
