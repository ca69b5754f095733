//! Relationship Manager
//!
//! Drives the friend-request state machine between two distinct users:
//!
//! ```text
//! None --send_request(a, b)--> Pending(a -> b) --accept_request(a, b)--> Friends
//! ```
//!
//! Each transition is a short saga of single-record writes. All work on a
//! pair runs under that pair's lock, so the snapshot a transition is planned
//! from stays valid until its writes finish. When a write fails after an
//! earlier one succeeded the manager optionally writes back the records it
//! already changed, restoring their arrays in order, and always reports [`RelationshipError::PartialFailure`].

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::error::{RelationshipError, RelationshipOperation};
use super::locks::PairLocks;
use super::state::{PairSnapshot, PairState};
use crate::backend::auth::users::User;
use crate::backend::store::{RelationField, UserPatch, UserStore};
use crate::shared::messaging::UserProfile;

/// Result of a successful `send_request`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    /// The request was recorded on both sides
    Sent,
    /// The same request was already pending; nothing was written
    AlreadyPending,
}

impl SendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendOutcome::Sent => "sent",
            SendOutcome::AlreadyPending => "already_pending",
        }
    }
}

/// One single-record write of a saga
#[derive(Debug, Clone)]
struct WriteStep {
    user_id: Uuid,
    patch: UserPatch,
    undo: UserPatch,
}

/// Friend-request state machine over a [`UserStore`]
pub struct RelationshipManager {
    users: Arc<dyn UserStore>,
    locks: PairLocks,
    compensate: bool,
}

impl RelationshipManager {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            locks: PairLocks::new(),
            compensate: true,
        }
    }

    /// Whether completed writes are undone after a partial failure
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate = enabled;
        self
    }

    pub fn locks(&self) -> &PairLocks {
        &self.locks
    }

    /// Record a friend request from `from` to `to`
    ///
    /// Idempotent for a request that is already pending in the same
    /// direction. Rejected with `Conflict` when the users are friends, when
    /// the opposite request is pending, or when the pair is inconsistent.
    pub async fn send_request(&self, from: Uuid, to: Uuid) -> Result<SendOutcome, RelationshipError> {
        ensure_distinct(from, to)?;
        let _guard = self.locks.lock(from, to).await;
        let (sender, recipient) = self.load_pair(from, to).await?;
        let snapshot = PairSnapshot::from_users(&sender, &recipient);

        match snapshot.state {
            PairState::None => {}
            PairState::Pending { from: pending_from, .. } if pending_from == from => {
                tracing::debug!(%from, %to, "Friend request already pending");
                return Ok(SendOutcome::AlreadyPending);
            }
            PairState::Pending { .. } => {
                tracing::warn!(%from, %to, "Friend request rejected: opposite request pending");
                return Err(RelationshipError::conflict(
                    "A friend request from the other user is already pending; accept it instead",
                    snapshot,
                ));
            }
            PairState::Friends => {
                tracing::warn!(%from, %to, "Friend request rejected: already friends");
                return Err(RelationshipError::conflict("Users are already friends", snapshot));
            }
            PairState::Inconsistent => {
                tracing::warn!(%from, %to, "Friend request rejected: pair is inconsistent");
                return Err(RelationshipError::conflict(
                    "Relationship state is inconsistent and must be repaired",
                    snapshot,
                ));
            }
        }

        let target = PairState::Pending { from, to };
        // Recipient first, then sender.
        let steps = plan(&snapshot, target, [&recipient, &sender]);
        self.run_saga(RelationshipOperation::SendRequest, steps).await?;

        tracing::info!(%from, %to, "Friend request sent");
        Ok(SendOutcome::Sent)
    }

    /// Accept the pending request `sender -> recipient`
    ///
    /// Fails with `Conflict` unless exactly that request is pending.
    pub async fn accept_request(&self, sender: Uuid, recipient: Uuid) -> Result<(), RelationshipError> {
        ensure_distinct(sender, recipient)?;
        let _guard = self.locks.lock(sender, recipient).await;
        let (sender_user, recipient_user) = self.load_pair(sender, recipient).await?;
        let snapshot = PairSnapshot::from_users(&sender_user, &recipient_user);

        if snapshot.state != (PairState::Pending { from: sender, to: recipient }) {
            tracing::warn!(%sender, %recipient, state = ?snapshot.state, "Accept rejected: no pending request");
            return Err(RelationshipError::conflict(
                "No pending friend request from this sender",
                snapshot,
            ));
        }

        // Sender first, then recipient.
        let steps = plan(&snapshot, PairState::Friends, [&sender_user, &recipient_user]);
        self.run_saga(RelationshipOperation::AcceptRequest, steps).await?;

        tracing::info!(%sender, %recipient, "Friend request accepted");
        Ok(())
    }

    /// Users who sent `user_id` a pending request, in arrival order
    pub async fn list_incoming(&self, user_id: Uuid) -> Result<Vec<UserProfile>, RelationshipError> {
        self.list_related(user_id, RelationField::FriendRequests).await
    }

    /// Users `user_id` sent a pending request to, in sending order
    pub async fn list_sent(&self, user_id: Uuid) -> Result<Vec<UserProfile>, RelationshipError> {
        self.list_related(user_id, RelationField::SentFriendRequests).await
    }

    /// Confirmed friends of `user_id`, in the order they were confirmed
    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<UserProfile>, RelationshipError> {
        self.list_related(user_id, RelationField::Friends).await
    }

    /// Ids of the confirmed friends of `user_id`
    pub async fn list_friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RelationshipError> {
        let user = self.load(user_id).await?;
        Ok(user.friends)
    }

    /// Reconciliation read: the markers both records hold about each other
    pub async fn pair_state(&self, a: Uuid, b: Uuid) -> Result<PairSnapshot, RelationshipError> {
        ensure_distinct(a, b)?;
        let (user_a, user_b) = self.load_pair(a, b).await?;
        Ok(PairSnapshot::from_users(&user_a, &user_b))
    }

    /// Move an inconsistent pair to the state given by
    /// [`PairSnapshot::repair_target`]; consistent pairs are left alone
    pub async fn repair_pair(&self, a: Uuid, b: Uuid) -> Result<PairSnapshot, RelationshipError> {
        ensure_distinct(a, b)?;
        let _guard = self.locks.lock(a, b).await;
        let (user_a, user_b) = self.load_pair(a, b).await?;
        let snapshot = PairSnapshot::from_users(&user_a, &user_b);
        if snapshot.is_consistent() {
            return Ok(snapshot);
        }

        let target = snapshot.repair_target();
        tracing::warn!(
            user_a = %a,
            user_b = %b,
            anomalies = ?snapshot.anomalies(),
            repair_to = ?target,
            "Repairing inconsistent relationship"
        );
        let steps = plan(&snapshot, target, [&user_a, &user_b]);
        self.run_saga(RelationshipOperation::RepairPair, steps).await?;

        let (user_a, user_b) = self.load_pair(a, b).await?;
        Ok(PairSnapshot::from_users(&user_a, &user_b))
    }

    async fn load(&self, id: Uuid) -> Result<User, RelationshipError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(RelationshipError::NotFound(id))
    }

    async fn load_pair(&self, a: Uuid, b: Uuid) -> Result<(User, User), RelationshipError> {
        let first = self.load(a).await?;
        let second = self.load(b).await?;
        Ok((first, second))
    }

    async fn list_related(
        &self,
        user_id: Uuid,
        field: RelationField,
    ) -> Result<Vec<UserProfile>, RelationshipError> {
        let user = self.load(user_id).await?;
        let ids = user.relation(field);
        let mut found: HashMap<Uuid, User> = self
            .users
            .find_many(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut profiles = Vec::with_capacity(ids.len());
        for id in ids {
            match found.remove(id) {
                Some(related) => profiles.push(related.profile()),
                None => tracing::warn!(%user_id, missing = %id, field = field.column(), "Dangling relationship entry"),
            }
        }
        Ok(profiles)
    }

    async fn run_saga(
        &self,
        operation: RelationshipOperation,
        steps: Vec<WriteStep>,
    ) -> Result<(), RelationshipError> {
        let mut completed: Vec<WriteStep> = Vec::with_capacity(steps.len());
        for step in steps {
            match self.users.update(step.user_id, &step.patch).await {
                Ok(()) => completed.push(step),
                Err(source) if completed.is_empty() => {
                    tracing::error!(%operation, user_id = %step.user_id, error = %source, "Relationship write failed");
                    return Err(RelationshipError::Persistence(source));
                }
                Err(source) => {
                    let compensated = self.compensate && self.undo(&completed).await;
                    let written: Vec<Uuid> = completed.iter().map(|s| s.user_id).collect();
                    tracing::error!(
                        %operation,
                        failed = %step.user_id,
                        completed = ?written,
                        compensated,
                        error = %source,
                        "Relationship operation partially applied"
                    );
                    return Err(RelationshipError::PartialFailure {
                        operation,
                        completed: written,
                        failed: step.user_id,
                        source,
                        compensated,
                    });
                }
            }
        }
        Ok(())
    }

    async fn undo(&self, completed: &[WriteStep]) -> bool {
        for step in completed.iter().rev() {
            if let Err(e) = self.users.update(step.user_id, &step.undo).await {
                tracing::error!(user_id = %step.user_id, error = %e, "Compensating write failed");
                return false;
            }
        }
        true
    }
}

fn ensure_distinct(a: Uuid, b: Uuid) -> Result<(), RelationshipError> {
    if a == b {
        return Err(RelationshipError::InvalidInput(
            "a user cannot have a relationship with themselves".to_string(),
        ));
    }
    Ok(())
}

/// Writes moving `snapshot` to `target`, one per user in `order`; users
/// whose markers already match are skipped
fn plan(snapshot: &PairSnapshot, target: PairState, order: [&User; 2]) -> Vec<WriteStep> {
    order
        .into_iter()
        .filter_map(|user| {
            let user_id = user.id;
            let other = if user_id == snapshot.user_a { snapshot.user_b } else { snapshot.user_a };
            let patch = snapshot
                .side(user_id)
                .patch_to(&snapshot.target_markers(target, user_id), other);
            if patch.is_empty() {
                return None;
            }
            let undo = patch.inverse(user);
            Some(WriteStep { user_id, patch, undo })
        })
        .collect()
}
