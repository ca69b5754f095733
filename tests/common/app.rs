//! HTTP test server helpers

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use confab::backend::messaging::db::MessageStore;
use confab::backend::server::{build_app, AppState};
use confab::shared::config::ServerConfig;

/// A test server over in-memory stores with its own upload directory
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub uploads: TempDir,
}

/// A registered, logged-in user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

pub fn test_config(uploads: &TempDir) -> ServerConfig {
    ServerConfig::builder()
        .jwt_secret("integration-test-secret")
        .bcrypt_cost(4)
        .upload_dir(uploads.path())
        .build()
        .unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(&test_config(&uploads));
        let server = TestServer::new(build_app(state.clone())).unwrap();
        Self { server, state, uploads }
    }

    /// Like `new`, with `messages` in place of the in-memory message store
    pub fn with_messages(messages: Arc<dyn MessageStore>) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut state = AppState::in_memory(&test_config(&uploads));
        state.messages = messages;
        let server = TestServer::new(build_app(state.clone())).unwrap();
        Self { server, state, uploads }
    }

    /// Register `name` through the API and log in
    pub async fn register(&self, name: &str) -> TestUser {
        let email = format!("{}@example.com", name.to_lowercase());
        let password = format!("{name}-password");

        let response = self
            .server
            .post("/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

        let response = self
            .server
            .post("/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let token = body["token"].as_str().unwrap().to_string();

        TestUser {
            id,
            name: name.to_string(),
            email,
            token,
        }
    }
}

impl TestUser {
    /// `Authorization` header value for this user's token
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap()
    }
}
