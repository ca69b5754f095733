//! User Store
//!
//! Persistence for user records and their relationship arrays.
//!
//! # Architecture
//!
//! - **`UserStore`** - The trait every backend implements
//! - **`memory`** - `MemoryUserStore`, used when no database is configured and in tests
//! - **`postgres`** - `PgUserStore`, backed by sqlx and PostgreSQL `UUID[]` columns
//!
//! # Consistency
//!
//! Each call reads or writes exactly one record. An [`UserPatch`] is applied
//! to its record atomically, but nothing spans two records: keeping a pair of
//! users consistent is the relationship manager's job.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Store-level failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated
    #[error("a record with this {field} already exists")]
    Duplicate { field: &'static str },

    /// The record to update does not exist
    #[error("record {0} does not exist")]
    Missing(Uuid),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One of the three relationship arrays on a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationField {
    FriendRequests,
    SentFriendRequests,
    Friends,
}

impl RelationField {
    pub const ALL: [RelationField; 3] = [
        RelationField::FriendRequests,
        RelationField::SentFriendRequests,
        RelationField::Friends,
    ];

    /// Column name in the `users` table
    pub fn column(&self) -> &'static str {
        match self {
            RelationField::FriendRequests => "friend_requests",
            RelationField::SentFriendRequests => "sent_friend_requests",
            RelationField::Friends => "friends",
        }
    }
}

/// A single array mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOp {
    /// Append the id unless it is already present
    Push(RelationField, Uuid),
    /// Remove every occurrence of the id
    Pull(RelationField, Uuid),
    /// Insert the id at the index (clamped to the length) unless it is
    /// already present
    Insert(RelationField, Uuid, usize),
}

/// Ordered list of array mutations applied to one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    ops: Vec<RelationOp>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, field: RelationField, id: Uuid) -> Self {
        self.ops.push(RelationOp::Push(field, id));
        self
    }

    pub fn pull(mut self, field: RelationField, id: Uuid) -> Self {
        self.ops.push(RelationOp::Pull(field, id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The patch taking a record this one was applied to back to `before`
    ///
    /// Pushed ids `before` did not hold are pulled again. Pulled ids go back
    /// to the index they had in `before`, so array order is restored.
    pub fn inverse(&self, before: &User) -> Self {
        let mut ops: Vec<RelationOp> = self
            .ops
            .iter()
            .rev()
            .filter_map(|op| match *op {
                RelationOp::Push(field, id) if !before.relation(field).contains(&id) => {
                    Some(RelationOp::Pull(field, id))
                }
                _ => None,
            })
            .collect();

        let mut restores: Vec<(usize, RelationField, Uuid)> = Vec::new();
        for op in &self.ops {
            if let RelationOp::Pull(field, id) = *op {
                let position = before.relation(field).iter().position(|existing| *existing == id);
                if let Some(index) = position {
                    if !restores.iter().any(|(_, f, i)| *f == field && *i == id) {
                        restores.push((index, field, id));
                    }
                }
            }
        }
        // Ascending indices rebuild each array front to back.
        restores.sort_by_key(|(index, _, _)| *index);
        ops.extend(
            restores
                .into_iter()
                .map(|(index, field, id)| RelationOp::Insert(field, id, index)),
        );
        Self { ops }
    }

    /// Apply the patch to an in-memory record
    pub fn apply_to(&self, user: &mut User) {
        for op in &self.ops {
            match *op {
                RelationOp::Push(field, id) => {
                    let list = user.relation_mut(field);
                    if !list.contains(&id) {
                        list.push(id);
                    }
                }
                RelationOp::Pull(field, id) => {
                    user.relation_mut(field).retain(|existing| *existing != id);
                }
                RelationOp::Insert(field, id, index) => {
                    let list = user.relation_mut(field);
                    if !list.contains(&id) {
                        let at = index.min(list.len());
                        list.insert(at, id);
                    }
                }
            }
        }
    }
}

/// Access contract for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails with `Duplicate` when the email is taken
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Look up a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fetch every user whose id is in `ids`; order is unspecified and
    /// unknown ids are skipped
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;

    /// Every user except `id`, in registration order
    async fn list_except(&self, id: Uuid) -> Result<Vec<User>, StoreError>;

    /// Apply `patch` to the record `id` atomically
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), StoreError>;
}
