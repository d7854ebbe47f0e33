// src/domain/friendship.rs
//
// Friendship state machine.
//
// An edge (requester -> target) exists only while a request has been made
// and not withdrawn. Transitions are computed here on the pair of edges
// between two users; storage backends apply the result atomically.

use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// One-sided request, not yet reciprocated
    Pending,
    /// Reciprocated; recorded on both directed edges
    Confirmed,
}

/// Both directed edges between two users, seen from the acting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgePair {
    /// actor -> other
    pub forward: Option<FriendshipStatus>,
    /// other -> actor
    pub reverse: Option<FriendshipStatus>,
}

impl EdgePair {
    pub fn new(forward: Option<FriendshipStatus>, reverse: Option<FriendshipStatus>) -> Self {
        Self { forward, reverse }
    }

    /// Actor asks to befriend the other user.
    ///
    /// A reverse edge in any state confirms both sides. Otherwise the forward
    /// edge becomes PENDING unless it already exists.
    pub fn after_request(self) -> EdgePair {
        match self.reverse {
            Some(_) => EdgePair::new(
                Some(FriendshipStatus::Confirmed),
                Some(FriendshipStatus::Confirmed),
            ),
            None => EdgePair::new(
                Some(self.forward.unwrap_or(FriendshipStatus::Pending)),
                None,
            ),
        }
    }

    /// Actor withdraws. The forward edge disappears and a surviving reverse
    /// edge drops back to PENDING.
    pub fn after_withdraw(self) -> EdgePair {
        EdgePair::new(None, self.reverse.map(|_| FriendshipStatus::Pending))
    }
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "PENDING",
            FriendshipStatus::Confirmed => "CONFIRMED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(FriendshipStatus::Pending),
            "CONFIRMED" => Some(FriendshipStatus::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user cannot send a friend request to themselves
pub fn ensure_distinct_users(user_id: UserId, friend_id: UserId) -> DomainResult<()> {
    if user_id == friend_id {
        return Err(DomainError::SelfFriendship { user_id });
    }
    Ok(())
}
