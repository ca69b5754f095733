//! HTTP API integration tests
//!
//! Every request goes through the full router (auth middleware, handlers,
//! error conversion) over in-memory stores.

mod common;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use common::{TestApp, UnavailableMessageStore};
use confab::backend::store::{RelationField, UserPatch, UserStore};
use confab::shared::messaging::{MessageView, UserDetails, UserProfile};

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;

    let response = app
        .server
        .get(&format!("/user/{}", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    response.assert_status_ok();
    let details: UserDetails = response.json();
    assert_eq!(details.profile.email, "alice@example.com");
    assert!(details.friends.is_empty());

    let raw: Value = response.json();
    assert!(raw.get("password").is_none());
    assert!(raw.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("Alice").await;

    let response = app
        .server
        .post("/register")
        .json(&json!({ "name": "Other", "email": "ALICE@example.com", "password": "pw" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = TestApp::new();
    let response = app
        .server
        .post("/register")
        .json(&json!({ "name": "Alice", "email": "not-an-email", "password": "pw" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.register("Alice").await;

    let missing = app.server.post("/login").json(&json!({ "email": "alice@example.com" })).await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let wrong_password = app
        .server
        .post("/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrong" }))
        .await;
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let unknown = app
        .server
        .post("/login")
        .json(&json!({ "email": "nobody@example.com", "password": "wrong" }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json();
    let b: Value = unknown.json();
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;

    let response = app.server.get(&format!("/users/{}", alice.id)).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get(&format!("/users/{}", alice.id))
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-token"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_list_users_excludes_caller() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let carol = app.register("Carol").await;

    let response = app
        .server
        .get(&format!("/users/{}", bob.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .await;
    response.assert_status_ok();
    let users: Vec<UserProfile> = response.json();
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![alice.id, carol.id]);
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let response = app
        .server
        .get(&format!("/user/{}", Uuid::new_v4()))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_friend_request_flow() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let send_body = json!({ "currentUserId": alice.id, "selectedUserId": bob.id });

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&send_body)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["outcome"], "sent");

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&send_body)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["outcome"], "already_pending");

    let response = app
        .server
        .get(&format!("/friend-request/{}", bob.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .await;
    let incoming: Vec<UserProfile> = response.json();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].name, "Alice");

    let response = app
        .server
        .get(&format!("/friend-requests/sent/{}", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    let sent: Vec<UserProfile> = response.json();
    assert_eq!(sent[0].id, bob.id);

    let response = app
        .server
        .post("/friend-request/accept")
        .add_header(AUTHORIZATION, bob.bearer())
        .json(&json!({ "senderId": alice.id, "recepientId": bob.id }))
        .await;
    response.assert_status_ok();

    let response = app
        .server
        .get(&format!("/friends/{}", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    let friend_ids: Vec<Uuid> = response.json();
    assert_eq!(friend_ids, vec![bob.id]);

    let response = app
        .server
        .get(&format!("/accepted-friends/{}", bob.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .await;
    let friends: Vec<UserProfile> = response.json();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, alice.id);

    let response = app
        .server
        .get(&format!("/relationships/{}/{}", alice.id, bob.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    let snapshot: Value = response.json();
    assert_eq!(snapshot["state"]["state"], "friends");
}

#[tokio::test]
async fn test_acting_for_another_user_is_forbidden() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, bob.bearer())
        .json(&json!({ "currentUserId": alice.id, "selectedUserId": bob.id }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    app.server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "currentUserId": alice.id, "selectedUserId": bob.id }))
        .await
        .assert_status_ok();

    // Only the recipient may accept.
    let response = app
        .server
        .post("/friend-request/accept")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "senderId": alice.id, "recipientId": bob.id }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_relationship_conflicts_carry_snapshot() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let response = app
        .server
        .post("/friend-request/accept")
        .add_header(AUTHORIZATION, bob.bearer())
        .json(&json!({ "senderId": alice.id, "recipientId": bob.id }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["details"]["state"]["state"], "none");

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "currentUserId": alice.id, "selectedUserId": alice.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "currentUserId": alice.id, "selectedUserId": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repair_endpoint_fixes_one_sided_friendship() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    // Leave Alice listing Bob as a friend with nothing on Bob's side.
    let patch = UserPatch::new().push(RelationField::Friends, bob.id);
    app.state.users.update(alice.id, &patch).await.unwrap();

    let response = app
        .server
        .get(&format!("/relationships/{}/{}", alice.id, bob.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .await;
    let snapshot: Value = response.json();
    assert_eq!(snapshot["state"]["state"], "inconsistent");

    let carol = app.register("Carol").await;
    let response = app
        .server
        .post("/relationships/repair")
        .add_header(AUTHORIZATION, carol.bearer())
        .json(&json!({ "userId": alice.id, "otherId": bob.id }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/relationships/repair")
        .add_header(AUTHORIZATION, bob.bearer())
        .json(&json!({ "userId": alice.id, "otherId": bob.id }))
        .await;
    response.assert_status_ok();
    let snapshot: Value = response.json();
    assert_eq!(snapshot["state"]["state"], "friends");
}

#[tokio::test]
async fn test_text_messages_round_trip() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    for (from, to, text) in [(&alice, &bob, "hi bob"), (&bob, &alice, "hi alice")] {
        let form = MultipartForm::new()
            .add_text("senderId", from.id.to_string())
            .add_text("recipientId", to.id.to_string())
            .add_text("messageType", "text")
            .add_text("messageText", text);
        app.server
            .post("/messages")
            .add_header(AUTHORIZATION, from.bearer())
            .multipart(form)
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get(&format!("/messages/{}/{}", alice.id, bob.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    response.assert_status_ok();
    let messages: Vec<MessageView> = response.json();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message.as_deref(), Some("hi bob"));
    assert_eq!(messages[0].sender.name, "Alice");
    assert_eq!(messages[1].sender.id, bob.id);
    assert!(messages[0].timestamp <= messages[1].timestamp);

    let carol = app.register("Carol").await;
    let response = app
        .server
        .get(&format!("/messages/{}/{}", alice.id, bob.id))
        .add_header(AUTHORIZATION, carol.bearer())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_message_sender_must_be_caller() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let form = MultipartForm::new()
        .add_text("senderId", alice.id.to_string())
        .add_text("recipientId", bob.id.to_string())
        .add_text("messageType", "text")
        .add_text("messageText", "spoofed");
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, bob.bearer())
        .multipart(form)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_image_message_is_saved_and_served() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let image = b"\x89PNG not really a png".to_vec();

    let form = MultipartForm::new()
        .add_text("senderId", alice.id.to_string())
        .add_text("recepientId", bob.id.to_string())
        .add_text("messageType", "image")
        .add_part(
            "imageFile",
            Part::bytes(image.clone()).file_name("cat.png").mime_type("image/png"),
        );
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(form)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let image_url = body["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("files/"));
    assert!(image_url.ends_with("-cat.png"));

    let stored = std::fs::read_dir(app.uploads.path()).unwrap().count();
    assert_eq!(stored, 1);

    let response = app
        .server
        .get(&format!("/{image_url}"))
        .add_header(AUTHORIZATION, alice.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), image.as_slice());
}

#[tokio::test]
async fn test_image_message_without_file_is_rejected() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let form = MultipartForm::new()
        .add_text("senderId", alice.id.to_string())
        .add_text("recipientId", bob.id.to_string())
        .add_text("messageType", "image");
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_image_message_leaves_no_file() {
    let app = TestApp::with_messages(Arc::new(UnavailableMessageStore));
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let form = MultipartForm::new()
        .add_text("senderId", alice.id.to_string())
        .add_text("recipientId", bob.id.to_string())
        .add_text("messageType", "image")
        .add_part(
            "imageFile",
            Part::bytes(b"not a png".to_vec()).file_name("cat.png").mime_type("image/png"),
        );
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(form)
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let stored = std::fs::read_dir(app.uploads.path()).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_malformed_json_bodies_are_400() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;

    let response = app
        .server
        .post("/deleteMessages")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "messages": ["not-an-id"] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid messages");
    assert_eq!(body["status"], 400);

    let response = app
        .server
        .post("/friend-request")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "currentUserId": alice.id, "selectedUserId": 42 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_delete_messages() {
    let app = TestApp::new();
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let form = MultipartForm::new()
        .add_text("senderId", alice.id.to_string())
        .add_text("recipientId", bob.id.to_string())
        .add_text("messageType", "text")
        .add_text("messageText", "delete me");
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(form)
        .await;
    let sent: Value = response.json();
    let message_id = sent["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/deleteMessages")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "messages": [] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/deleteMessages")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/deleteMessages")
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "messages": [message_id] }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["deleted"], 1);

    let response = app
        .server
        .get(&format!("/messages/{}/{}", bob.id, alice.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .await;
    let messages: Vec<MessageView> = response.json();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();
    let response = app.server.get("/nowhere").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], 404);
}
