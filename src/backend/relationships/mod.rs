//! Relationships Module
//!
//! The friend-request state machine and everything it needs:
//!
//! - **`state`** - Derives a pair's state from both user records
//! - **`locks`** - Per-pair async mutexes
//! - **`manager`** - `RelationshipManager`, the transitions and listings
//! - **`error`** - `RelationshipError`
//! - **`handlers`** - HTTP handlers for the friend endpoints
//!
//! # States
//!
//! | State | A's record | B's record |
//! |---|---|---|
//! | None | nothing about B | nothing about A |
//! | Pending(A→B) | B in `sent_friend_requests` | A in `friend_requests` |
//! | Friends | B in `friends` | A in `friends` |
//!
//! Any other combination is `Inconsistent` and can only be left through
//! `repair_pair`.

pub mod error;
pub mod handlers;
pub mod locks;
pub mod manager;
pub mod state;

pub use error::{RelationshipError, RelationshipOperation};
pub use locks::{PairGuard, PairKey, PairLocks};
pub use manager::{RelationshipManager, SendOutcome};
pub use state::{Anomaly, PairSnapshot, PairState, SideMarkers};
