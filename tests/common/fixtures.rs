//! Users and managers over in-memory stores

use std::sync::Arc;
use uuid::Uuid;

use confab::backend::auth::users::NewUser;
use confab::backend::relationships::RelationshipManager;
use confab::backend::store::{MemoryUserStore, UserStore};

pub fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: "not-a-real-hash".to_string(),
        image: None,
    }
}

/// Insert users with the given names and return their ids in order
pub async fn seed_users(store: &dyn UserStore, names: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(store.insert(new_user(name)).await.unwrap().id);
    }
    ids
}

/// A manager over a fresh in-memory store with two users, Alice and Bob
pub async fn manager_with_pair() -> (Arc<RelationshipManager>, Arc<MemoryUserStore>, Uuid, Uuid) {
    let store = Arc::new(MemoryUserStore::new());
    let ids = seed_users(store.as_ref(), &["Alice", "Bob"]).await;
    let manager = Arc::new(RelationshipManager::new(store.clone()));
    (manager, store, ids[0], ids[1])
}
