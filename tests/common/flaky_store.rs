//! Stores that fail on demand

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use confab::backend::auth::users::{NewUser, User};
use confab::backend::messaging::db::MessageStore;
use confab::shared::messaging::ChatMessage;
use confab::backend::store::{MemoryUserStore, StoreError, UserPatch, UserStore};

#[derive(Debug, Default, Clone, Copy)]
struct FailurePlan {
    /// Updates still allowed through before failures start
    skip: usize,
    /// Updates to fail once `skip` is used up
    fail: usize,
}

/// Wraps `MemoryUserStore`; reads always succeed, updates fail on demand
#[derive(Debug, Default)]
pub struct FlakyUserStore {
    inner: MemoryUserStore,
    plan: Mutex<FailurePlan>,
    updates: Mutex<Vec<Uuid>>,
}

impl FlakyUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let the next `skip` updates succeed, then fail the following `fail`
    pub fn fail_updates(&self, skip: usize, fail: usize) {
        *self.plan.lock().unwrap() = FailurePlan { skip, fail };
    }

    /// Ids of the records every update call targeted, in call order
    pub fn update_log(&self) -> Vec<Uuid> {
        self.updates.lock().unwrap().clone()
    }

    fn should_fail(&self) -> bool {
        let mut plan = self.plan.lock().unwrap();
        if plan.skip > 0 {
            plan.skip -= 1;
            return false;
        }
        if plan.fail > 0 {
            plan.fail -= 1;
            return true;
        }
        false
    }
}

#[async_trait]
impl UserStore for FlakyUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.inner.insert(new_user).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_by_email(email).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        self.inner.find_many(ids).await
    }

    async fn list_except(&self, id: Uuid) -> Result<Vec<User>, StoreError> {
        self.inner.list_except(id).await
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), StoreError> {
        self.updates.lock().unwrap().push(id);
        if self.should_fail() {
            return Err(StoreError::Unavailable(format!("injected failure updating {id}")));
        }
        self.inner.update(id, patch).await
    }
}

/// Message store whose writes always fail
#[derive(Debug, Default)]
pub struct UnavailableMessageStore;

#[async_trait]
impl MessageStore for UnavailableMessageStore {
    async fn insert(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        Err(StoreError::Unavailable(format!("injected failure storing {}", message.id)))
    }

    async fn between(&self, _a: Uuid, _b: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(Vec::new())
    }

    async fn delete_many(&self, _ids: &[Uuid], _participant: Uuid) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("injected failure deleting messages".to_string()))
    }
}
