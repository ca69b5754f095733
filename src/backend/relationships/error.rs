//! Relationship errors

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::state::PairSnapshot;
use crate::backend::store::StoreError;

/// Multi-write relationship operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipOperation {
    SendRequest,
    AcceptRequest,
    RepairPair,
}

impl fmt::Display for RelationshipOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipOperation::SendRequest => "send_request",
            RelationshipOperation::AcceptRequest => "accept_request",
            RelationshipOperation::RepairPair => "repair_pair",
        };
        f.write_str(name)
    }
}

/// Failures of the relationship manager
#[derive(Debug, Error)]
pub enum RelationshipError {
    /// A referenced user id does not resolve
    #[error("user {0} not found")]
    NotFound(Uuid),

    /// Missing or self-referential ids
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pair's current state does not allow the transition
    #[error("{message}")]
    Conflict {
        message: String,
        snapshot: Box<PairSnapshot>,
    },

    /// The store failed before anything was written
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// Some writes of the operation landed and a later one failed
    #[error(
        "{operation} partially applied: wrote {completed:?}, failed on {failed}: {source}"
    )]
    PartialFailure {
        operation: RelationshipOperation,
        /// Users whose records were written before the failure
        completed: Vec<Uuid>,
        /// User whose write failed
        failed: Uuid,
        #[source]
        source: StoreError,
        /// Whether the completed writes were undone
        compensated: bool,
    },
}

impl RelationshipError {
    pub fn conflict(message: impl Into<String>, snapshot: PairSnapshot) -> Self {
        Self::Conflict {
            message: message.into(),
            snapshot: Box::new(snapshot),
        }
    }
}
