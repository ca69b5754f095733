/**
 * Friend Request HTTP Handlers
 *
 * Thin wrappers that map the REST surface onto `RelationshipManager`.
 * Handlers take the manager directly through `FromRef`, so none of them
 * touch the user store.
 *
 * Mutations must be issued by the user they act for: the sender of a
 * request, the recipient accepting it, or one of the two users of a pair
 * being repaired. Anything else is 403 Forbidden.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::manager::{RelationshipManager, SendOutcome};
use super::state::PairSnapshot;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthenticatedUser;
use crate::shared::messaging::{
    AcceptFriendRequestRequest, PairRequest, SendFriendRequestRequest,
    SendFriendRequestResponse, StatusMessage, UserProfile,
};

/// POST /friend-request
pub async fn send_friend_request(
    State(relationships): State<Arc<RelationshipManager>>,
    Extension(auth): Extension<AuthenticatedUser>,
    payload: Result<Json<SendFriendRequestRequest>, JsonRejection>,
) -> Result<Json<SendFriendRequestResponse>, BackendError> {
    let Json(request) = payload?;
    auth.ensure_is(request.current_user_id)?;

    let outcome = relationships
        .send_request(request.current_user_id, request.selected_user_id)
        .await?;

    let message = match outcome {
        SendOutcome::Sent => "Friend request sent",
        SendOutcome::AlreadyPending => "Friend request already pending",
    };
    Ok(Json(SendFriendRequestResponse {
        message: message.to_string(),
        outcome: outcome.as_str().to_string(),
    }))
}

/// GET /friend-request/{userId}: users who sent `userId` a pending request
pub async fn list_incoming_requests(
    State(relationships): State<Arc<RelationshipManager>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    Ok(Json(relationships.list_incoming(user_id).await?))
}

/// POST /friend-request/accept
pub async fn accept_friend_request(
    State(relationships): State<Arc<RelationshipManager>>,
    Extension(auth): Extension<AuthenticatedUser>,
    payload: Result<Json<AcceptFriendRequestRequest>, JsonRejection>,
) -> Result<Json<StatusMessage>, BackendError> {
    let Json(request) = payload?;
    auth.ensure_is(request.recipient_id)?;

    relationships
        .accept_request(request.sender_id, request.recipient_id)
        .await?;

    Ok(Json(StatusMessage::new("Friend request accepted successfully")))
}

/// GET /accepted-friends/{userId}: friend profiles
pub async fn list_accepted_friends(
    State(relationships): State<Arc<RelationshipManager>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    Ok(Json(relationships.list_friends(user_id).await?))
}

/// GET /friends/{userId}: friend ids only
pub async fn list_friend_ids(
    State(relationships): State<Arc<RelationshipManager>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, BackendError> {
    Ok(Json(relationships.list_friend_ids(user_id).await?))
}

/// GET /friend-requests/sent/{userId}: users `userId` has a pending request to
pub async fn list_sent_requests(
    State(relationships): State<Arc<RelationshipManager>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    Ok(Json(relationships.list_sent(user_id).await?))
}

/// GET /relationships/{userId}/{otherId}: classified pair state
pub async fn get_pair_state(
    State(relationships): State<Arc<RelationshipManager>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((user_id, other_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PairSnapshot>, BackendError> {
    auth.ensure_one_of(user_id, other_id)?;
    Ok(Json(relationships.pair_state(user_id, other_id).await?))
}

/// POST /relationships/repair: reconcile an inconsistent pair
pub async fn repair_pair(
    State(relationships): State<Arc<RelationshipManager>>,
    Extension(auth): Extension<AuthenticatedUser>,
    payload: Result<Json<PairRequest>, JsonRejection>,
) -> Result<Json<PairSnapshot>, BackendError> {
    let Json(request) = payload?;
    auth.ensure_one_of(request.user_id, request.other_id)?;

    let snapshot = relationships.repair_pair(request.user_id, request.other_id).await?;
    tracing::info!(
        user_id = %request.user_id,
        other_id = %request.other_id,
        "Pair repaired"
    );
    Ok(Json(snapshot))
}
