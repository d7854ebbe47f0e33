// src/repositories/friendship_graph.rs
//
// Directed friendship edges keyed by (requester, target).
// The transitions themselves live in `domain::friendship`; a backend only
// has to read the edge pair and write the result back atomically.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::domain::{ensure_distinct_users, EdgePair, FriendshipStatus, UserId};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait FriendshipGraph: Send + Sync {
    /// Create a PENDING edge, or confirm both edges if the reverse exists.
    /// Returns whether any edge changed.
    fn request(&self, requester: UserId, target: UserId) -> AppResult<bool>;
    /// Drop the edge; a reverse edge is demoted to PENDING.
    /// Returns whether any edge changed.
    fn withdraw(&self, requester: UserId, target: UserId) -> AppResult<bool>;
    fn status(&self, requester: UserId, target: UserId) -> AppResult<Option<FriendshipStatus>>;
    /// Targets of CONFIRMED edges leaving `user_id`
    fn friends_of(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>>;
    fn edge_count(&self) -> AppResult<u64>;
    /// Drop every edge to or from a deleted user; returns how many went
    fn remove_user(&self, user_id: UserId) -> AppResult<u64>;

    fn common_friends(&self, user_id: UserId, other_id: UserId) -> AppResult<BTreeSet<UserId>> {
        let mine = self.friends_of(user_id)?;
        let theirs = self.friends_of(other_id)?;
        Ok(mine.intersection(&theirs).copied().collect())
    }
}

#[derive(Default)]
pub struct InMemoryFriendshipGraph {
    edges: Mutex<BTreeMap<(UserId, UserId), FriendshipStatus>>,
}

impl InMemoryFriendshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both edges, compute the next pair, write it back under one lock
    fn transition(
        &self,
        actor: UserId,
        other: UserId,
        step: impl FnOnce(EdgePair) -> EdgePair,
    ) -> AppResult<(EdgePair, EdgePair)> {
        let mut edges = self.edges.lock()?;
        let before = EdgePair::new(
            edges.get(&(actor, other)).copied(),
            edges.get(&(other, actor)).copied(),
        );
        let after = step(before);

        set_edge(&mut edges, (actor, other), after.forward);
        set_edge(&mut edges, (other, actor), after.reverse);
        Ok((before, after))
    }
}

fn set_edge(
    edges: &mut BTreeMap<(UserId, UserId), FriendshipStatus>,
    key: (UserId, UserId),
    status: Option<FriendshipStatus>,
) {
    match status {
        Some(status) => {
            edges.insert(key, status);
        }
        None => {
            edges.remove(&key);
        }
    }
}

impl FriendshipGraph for InMemoryFriendshipGraph {
    fn request(&self, requester: UserId, target: UserId) -> AppResult<bool> {
        ensure_distinct_users(requester, target)?;
        let (before, after) = self.transition(requester, target, EdgePair::after_request)?;
        Ok(before != after)
    }

    fn withdraw(&self, requester: UserId, target: UserId) -> AppResult<bool> {
        let (before, after) = self.transition(requester, target, EdgePair::after_withdraw)?;
        Ok(before != after)
    }

    fn status(&self, requester: UserId, target: UserId) -> AppResult<Option<FriendshipStatus>> {
        Ok(self.edges.lock()?.get(&(requester, target)).copied())
    }

    fn friends_of(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        let edges = self.edges.lock()?;
        Ok(edges
            .range((user_id, UserId::MIN)..=(user_id, UserId::MAX))
            .filter(|(_, status)| **status == FriendshipStatus::Confirmed)
            .map(|((_, target), _)| *target)
            .collect())
    }

    fn edge_count(&self) -> AppResult<u64> {
        Ok(self.edges.lock()?.len() as u64)
    }

    fn remove_user(&self, user_id: UserId) -> AppResult<u64> {
        let mut edges = self.edges.lock()?;
        let before = edges.len();
        edges.retain(|(requester, target), _| *requester != user_id && *target != user_id);
        Ok((before - edges.len()) as u64)
    }
}
