//! Pair state classification
//!
//! A pair's state is never stored; it is derived from the relationship
//! arrays on both user records. Each side contributes three markers about
//! the other user, and the six markers together map onto exactly one
//! [`PairState`].

use serde::Serialize;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::store::{RelationField, UserPatch};

/// What one user's record says about the other user of the pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideMarkers {
    /// Other user is in `friends`
    pub friend: bool,
    /// Other user is in `sent_friend_requests`
    pub sent: bool,
    /// Other user is in `friend_requests`
    pub incoming: bool,
}

impl SideMarkers {
    pub const FRIEND: SideMarkers = SideMarkers { friend: true, sent: false, incoming: false };
    pub const SENT: SideMarkers = SideMarkers { friend: false, sent: true, incoming: false };
    pub const INCOMING: SideMarkers = SideMarkers { friend: false, sent: false, incoming: true };

    /// Read the markers `holder` keeps about `other`
    pub fn read(holder: &User, other: Uuid) -> Self {
        Self {
            friend: holder.has_relation(RelationField::Friends, other),
            sent: holder.has_relation(RelationField::SentFriendRequests, other),
            incoming: holder.has_relation(RelationField::FriendRequests, other),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.friend && !self.sent && !self.incoming
    }

    fn has_request(&self) -> bool {
        self.sent || self.incoming
    }

    /// Patch turning these markers into `target`, with `other` as the element
    pub fn patch_to(&self, target: &SideMarkers, other: Uuid) -> UserPatch {
        let fields = [
            (RelationField::FriendRequests, self.incoming, target.incoming),
            (RelationField::SentFriendRequests, self.sent, target.sent),
            (RelationField::Friends, self.friend, target.friend),
        ];
        let mut patch = UserPatch::new();
        for (field, have, want) in fields {
            if have && !want {
                patch = patch.pull(field, other);
            }
        }
        for (field, have, want) in fields {
            if want && !have {
                patch = patch.push(field, other);
            }
        }
        patch
    }
}

/// Relationship state of an unordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PairState {
    /// No markers on either side
    None,
    /// `from` sent a request to `to` that is not yet accepted
    Pending { from: Uuid, to: Uuid },
    /// Both sides list each other as friends
    Friends,
    /// Markers match no defined state
    Inconsistent,
}

/// A violated relationship invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// `holder` lists the other user as a friend but not vice versa
    OneSidedFriendship { holder: Uuid },
    /// `holder` has a sent request with no matching incoming entry
    UnpairedSentRequest { holder: Uuid },
    /// `holder` has an incoming request with no matching sent entry
    UnpairedIncomingRequest { holder: Uuid },
    /// `holder` lists a friend that still has an outstanding request
    FriendWithOutstandingRequest { holder: Uuid },
    /// Requests are pending in both directions at once
    RequestsBothWays,
}

/// Markers of both sides plus the derived state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairSnapshot {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub a_side: SideMarkers,
    pub b_side: SideMarkers,
    pub state: PairState,
}

impl PairSnapshot {
    /// Read the snapshot from both records
    pub fn from_users(a: &User, b: &User) -> Self {
        Self::from_markers(a.id, b.id, SideMarkers::read(a, b.id), SideMarkers::read(b, a.id))
    }

    pub fn from_markers(user_a: Uuid, user_b: Uuid, a_side: SideMarkers, b_side: SideMarkers) -> Self {
        let state = classify(user_a, user_b, &a_side, &b_side);
        Self { user_a, user_b, a_side, b_side, state }
    }

    pub fn is_consistent(&self) -> bool {
        self.state != PairState::Inconsistent
    }

    /// Markers `user` should hold about the other user in `state`
    pub fn target_markers(&self, state: PairState, user: Uuid) -> SideMarkers {
        match state {
            PairState::None | PairState::Inconsistent => SideMarkers::default(),
            PairState::Friends => SideMarkers::FRIEND,
            PairState::Pending { from, .. } if from == user => SideMarkers::SENT,
            PairState::Pending { .. } => SideMarkers::INCOMING,
        }
    }

    /// The markers held by `user` in this snapshot
    pub fn side(&self, user: Uuid) -> SideMarkers {
        if user == self.user_a {
            self.a_side
        } else {
            self.b_side
        }
    }

    /// The defined state a repair should move this pair to
    ///
    /// Friend markers win (the friendship was being confirmed); otherwise a
    /// request seen on either side in exactly one direction is kept;
    /// anything else is cleared.
    pub fn repair_target(&self) -> PairState {
        if self.state != PairState::Inconsistent {
            return self.state;
        }
        if self.a_side.friend || self.b_side.friend {
            return PairState::Friends;
        }
        let a_to_b = self.a_side.sent || self.b_side.incoming;
        let b_to_a = self.b_side.sent || self.a_side.incoming;
        match (a_to_b, b_to_a) {
            (true, false) => PairState::Pending { from: self.user_a, to: self.user_b },
            (false, true) => PairState::Pending { from: self.user_b, to: self.user_a },
            _ => PairState::None,
        }
    }

    /// Invariants this snapshot violates
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        let sides = [
            (self.user_a, &self.a_side, &self.b_side),
            (self.user_b, &self.b_side, &self.a_side),
        ];
        for (holder, mine, theirs) in sides {
            if mine.friend && !theirs.friend {
                anomalies.push(Anomaly::OneSidedFriendship { holder });
            }
            if mine.sent && !theirs.incoming {
                anomalies.push(Anomaly::UnpairedSentRequest { holder });
            }
            if mine.incoming && !theirs.sent {
                anomalies.push(Anomaly::UnpairedIncomingRequest { holder });
            }
            if mine.friend && mine.has_request() {
                anomalies.push(Anomaly::FriendWithOutstandingRequest { holder });
            }
        }
        let a_to_b = self.a_side.sent || self.b_side.incoming;
        let b_to_a = self.b_side.sent || self.a_side.incoming;
        if a_to_b && b_to_a {
            anomalies.push(Anomaly::RequestsBothWays);
        }
        anomalies
    }
}

fn classify(user_a: Uuid, user_b: Uuid, a: &SideMarkers, b: &SideMarkers) -> PairState {
    match (*a, *b) {
        (a, b) if a.is_empty() && b.is_empty() => PairState::None,
        (SideMarkers::FRIEND, SideMarkers::FRIEND) => PairState::Friends,
        (SideMarkers::SENT, SideMarkers::INCOMING) => PairState::Pending { from: user_a, to: user_b },
        (SideMarkers::INCOMING, SideMarkers::SENT) => PairState::Pending { from: user_b, to: user_a },
        _ => PairState::Inconsistent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_defined_states() {
        let (a, b) = ids();
        let none = PairSnapshot::from_markers(a, b, SideMarkers::default(), SideMarkers::default());
        assert_eq!(none.state, PairState::None);

        let pending = PairSnapshot::from_markers(a, b, SideMarkers::SENT, SideMarkers::INCOMING);
        assert_eq!(pending.state, PairState::Pending { from: a, to: b });

        let reverse = PairSnapshot::from_markers(a, b, SideMarkers::INCOMING, SideMarkers::SENT);
        assert_eq!(reverse.state, PairState::Pending { from: b, to: a });

        let friends = PairSnapshot::from_markers(a, b, SideMarkers::FRIEND, SideMarkers::FRIEND);
        assert_eq!(friends.state, PairState::Friends);
        assert!(friends.anomalies().is_empty());
    }

    #[test]
    fn test_half_applied_accept_is_inconsistent() {
        let (a, b) = ids();
        // Sender updated, recipient still holds the incoming request.
        let snapshot = PairSnapshot::from_markers(a, b, SideMarkers::FRIEND, SideMarkers::INCOMING);
        assert_eq!(snapshot.state, PairState::Inconsistent);
        assert_eq!(
            snapshot.anomalies(),
            vec![
                Anomaly::OneSidedFriendship { holder: a },
                Anomaly::UnpairedIncomingRequest { holder: b },
            ]
        );
        assert_eq!(snapshot.repair_target(), PairState::Friends);
    }

    #[test]
    fn test_half_applied_send_repairs_to_pending() {
        let (a, b) = ids();
        let snapshot = PairSnapshot::from_markers(a, b, SideMarkers::default(), SideMarkers::INCOMING);
        assert_eq!(snapshot.state, PairState::Inconsistent);
        assert_eq!(snapshot.repair_target(), PairState::Pending { from: a, to: b });
    }

    #[test]
    fn test_requests_both_ways_repairs_to_none() {
        let (a, b) = ids();
        let both = SideMarkers { friend: false, sent: true, incoming: true };
        let snapshot = PairSnapshot::from_markers(a, b, both, both);
        assert!(snapshot.anomalies().contains(&Anomaly::RequestsBothWays));
        assert_eq!(snapshot.repair_target(), PairState::None);
    }

    #[test]
    fn test_patch_to_pulls_before_pushes() {
        let other = Uuid::new_v4();
        let patch = SideMarkers::SENT.patch_to(&SideMarkers::FRIEND, other);
        assert_eq!(
            patch,
            UserPatch::new()
                .pull(RelationField::SentFriendRequests, other)
                .push(RelationField::Friends, other)
        );
        assert!(SideMarkers::FRIEND.patch_to(&SideMarkers::FRIEND, other).is_empty());
    }

    #[test]
    fn test_target_markers_for_pending() {
        let (a, b) = ids();
        let snapshot = PairSnapshot::from_markers(a, b, SideMarkers::default(), SideMarkers::default());
        let pending = PairState::Pending { from: b, to: a };
        assert_eq!(snapshot.target_markers(pending, b), SideMarkers::SENT);
        assert_eq!(snapshot.target_markers(pending, a), SideMarkers::INCOMING);
    }

    #[test]
    fn test_snapshot_serializes_state_tag() {
        let (a, b) = ids();
        let snapshot = PairSnapshot::from_markers(a, b, SideMarkers::FRIEND, SideMarkers::FRIEND);
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["state"]["state"], "friends");
    }
}
