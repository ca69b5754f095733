/**
 * API Routes Configuration
 *
 * # Public
 *
 * - `POST /register` - User registration
 * - `POST /login` - User login
 *
 * # Authenticated (Bearer token)
 *
 * - `GET /users/{userId}` - All users except `userId`
 * - `GET /user/{userId}` - One user with relationship ids
 * - `POST /friend-request` - Send a friend request
 * - `GET /friend-request/{userId}` - Incoming requests
 * - `POST /friend-request/accept` - Accept a request
 * - `GET /accepted-friends/{userId}` - Friend profiles
 * - `GET /friends/{userId}` - Friend ids
 * - `GET /friend-requests/sent/{userId}` - Outgoing requests
 * - `GET /relationships/{userId}/{otherId}` - Pair state
 * - `POST /relationships/repair` - Reconcile a pair
 * - `POST /messages` - Send a message (multipart)
 * - `GET /messages/{senderId}/{recipientId}` - Conversation
 * - `POST /deleteMessages` - Delete messages
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_user, list_users, login, register};
use crate::backend::messaging::handlers::{delete_messages, get_messages, send_message};
use crate::backend::middleware::auth_middleware;
use crate::backend::relationships::handlers::{
    accept_friend_request, get_pair_state, list_accepted_friends, list_friend_ids,
    list_incoming_requests, list_sent_requests, repair_pair, send_friend_request,
};
use crate::backend::server::state::AppState;

/// Add the REST endpoints to `router`
///
/// The authenticated group is wrapped in `auth_middleware` with
/// `route_layer`, so unmatched paths still fall through to the fallback
/// instead of answering 401.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/{user_id}", get(list_users))
        .route("/user/{user_id}", get(get_user))
        .route("/friend-request", post(send_friend_request))
        .route("/friend-request/{user_id}", get(list_incoming_requests))
        .route("/friend-request/accept", post(accept_friend_request))
        .route("/accepted-friends/{user_id}", get(list_accepted_friends))
        .route("/friends/{user_id}", get(list_friend_ids))
        .route("/friend-requests/sent/{user_id}", get(list_sent_requests))
        .route("/relationships/{user_id}/{other_id}", get(get_pair_state))
        .route("/relationships/repair", post(repair_pair))
        .route("/messages", post(send_message))
        .route("/messages/{sender_id}/{recipient_id}", get(get_messages))
        .route("/deleteMessages", post(delete_messages))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}
