//! In-memory user store
//!
//! Keeps records in a `HashMap` behind a `tokio::sync::RwLock`, plus a
//! registration-order index so listings are stable.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserPatch, UserStore};
use crate::backend::auth::users::{NewUser, User};

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<Uuid, User>,
    order: Vec<Uuid>,
}

/// User store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<Records>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.records.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut records = self.records.write().await;
        if records.by_id.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        let user = User::new(new_user);
        records.order.push(user.id);
        records.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let records = self.records.read().await;
        Ok(records.by_id.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let records = self.records.read().await;
        Ok(ids.iter().filter_map(|id| records.by_id.get(id).cloned()).collect())
    }

    async fn list_except(&self, id: Uuid) -> Result<Vec<User>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .order
            .iter()
            .filter(|candidate| **candidate != id)
            .filter_map(|candidate| records.by_id.get(candidate).cloned())
            .collect())
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let user = records.by_id.get_mut(&id).ok_or(StoreError::Missing(id))?;
        patch.apply_to(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::RelationField;
    use assert_matches::assert_matches;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryUserStore::new();
        let alice = store.insert(new_user("Alice")).await.unwrap();

        let by_id = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Alice");
        let by_email = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, alice.id);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.insert(new_user("Alice")).await.unwrap();
        let result = store.insert(new_user("Alice")).await;
        assert_matches!(result, Err(StoreError::Duplicate { field: "email" }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_except_keeps_registration_order() {
        let store = MemoryUserStore::new();
        let alice = store.insert(new_user("Alice")).await.unwrap();
        let bob = store.insert(new_user("Bob")).await.unwrap();
        let carol = store.insert(new_user("Carol")).await.unwrap();

        let others: Vec<Uuid> = store
            .list_except(bob.id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(others, vec![alice.id, carol.id]);
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown_ids() {
        let store = MemoryUserStore::new();
        let alice = store.insert(new_user("Alice")).await.unwrap();
        let found = store.find_many(&[Uuid::new_v4(), alice.id]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, alice.id);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryUserStore::new();
        let alice = store.insert(new_user("Alice")).await.unwrap();
        let other = Uuid::new_v4();

        let patch = UserPatch::new().push(RelationField::SentFriendRequests, other);
        store.update(alice.id, &patch).await.unwrap();

        let alice = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(alice.sent_friend_requests, vec![other]);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryUserStore::new();
        let id = Uuid::new_v4();
        let result = store.update(id, &UserPatch::new()).await;
        assert_matches!(result, Err(StoreError::Missing(missing)) if missing == id);
    }
}
