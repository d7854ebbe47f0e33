// src/services/social_graph_service.rs
//
// User orchestration and friendship operations. Existence of both users is
// checked here before the friendship graph is touched.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};

use crate::domain::{ensure_distinct_users, FriendshipStatus, NewUser, User, UserId, UserPatch};
use crate::error::{AppError, AppResult};
use crate::repositories::{EntityStore, FriendshipGraph, LikeIndex};
use crate::services::entity_locks::EntityLocks;

pub struct SocialGraphService {
    user_store: Arc<dyn EntityStore<User>>,
    friendships: Arc<dyn FriendshipGraph>,
    like_index: Arc<dyn LikeIndex>,
    write_locks: EntityLocks,
}

impl SocialGraphService {
    pub fn new(
        user_store: Arc<dyn EntityStore<User>>,
        friendships: Arc<dyn FriendshipGraph>,
        like_index: Arc<dyn LikeIndex>,
    ) -> Self {
        Self {
            user_store,
            friendships,
            like_index,
            write_locks: EntityLocks::new(),
        }
    }

    pub fn create(&self, draft: NewUser) -> AppResult<User> {
        let user = draft
            .into_user(today())
            .inspect_err(|e| warn!("User rejected: {}", e))?;

        let saved = self.user_store.create(user)?;
        info!("User created: id={}, login='{}'", saved.id, saved.login);
        Ok(saved)
    }

    /// Merge only the supplied fields; a failure leaves the stored user as it was
    pub fn update(&self, id: UserId, patch: UserPatch) -> AppResult<User> {
        self.write_locks.with_lock(id, || {
            let current = self.require_user(id)?;
            let merged = current
                .apply_patch(patch, today())
                .inspect_err(|e| warn!("Update of user {} rejected: {}", id, e))?;

            let saved = self.user_store.update(merged)?;
            info!("User updated: id={}", saved.id);
            Ok(saved)
        })
    }

    pub fn find_by_id(&self, id: UserId) -> AppResult<User> {
        self.require_user(id)
    }

    pub fn find_all(&self) -> AppResult<Vec<User>> {
        self.user_store.find_all()
    }

    pub fn add_friend(&self, user_id: UserId, friend_id: UserId) -> AppResult<()> {
        self.ensure_user_exists(user_id)?;
        self.ensure_user_exists(friend_id)?;
        ensure_distinct_users(user_id, friend_id)?;

        if self.friendships.request(user_id, friend_id)? {
            info!("Friend request: {} -> {}", user_id, friend_id);
        } else {
            debug!("Friend request {} -> {} unchanged", user_id, friend_id);
        }
        Ok(())
    }

    /// Succeeds whether or not an edge existed
    pub fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> AppResult<()> {
        self.ensure_user_exists(user_id)?;
        self.ensure_user_exists(friend_id)?;

        if self.friendships.withdraw(user_id, friend_id)? {
            info!("Friendship withdrawn: {} -> {}", user_id, friend_id);
        } else {
            debug!("No friendship to withdraw: {} -> {}", user_id, friend_id);
        }
        Ok(())
    }

    /// Delete a user along with their friendship edges and likes
    pub fn delete(&self, id: UserId) -> AppResult<()> {
        self.write_locks.with_lock(id, || {
            self.ensure_user_exists(id)?;
            self.user_store.delete(id)?;
            let edges = self.friendships.remove_user(id)?;
            let likes = self.like_index.remove_user(id)?;
            info!(
                "User deleted: id={} ({} friendship edges, {} likes dropped)",
                id, edges, likes
            );
            Ok(())
        })
    }

    /// Confirmed friends of `user_id`, ordered by id
    pub fn friends_of(&self, user_id: UserId) -> AppResult<Vec<User>> {
        self.ensure_user_exists(user_id)?;
        let ids = self.friendships.friends_of(user_id)?;
        self.hydrate_users(ids)
    }

    pub fn common_friends(&self, user_id: UserId, other_id: UserId) -> AppResult<Vec<User>> {
        self.ensure_user_exists(user_id)?;
        self.ensure_user_exists(other_id)?;
        let ids = self.friendships.common_friends(user_id, other_id)?;
        self.hydrate_users(ids)
    }

    /// State of the directed edge `user_id -> friend_id`
    pub fn friendship_status(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> AppResult<Option<FriendshipStatus>> {
        self.ensure_user_exists(user_id)?;
        self.ensure_user_exists(friend_id)?;
        self.friendships.status(user_id, friend_id)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn hydrate_users(&self, ids: BTreeSet<UserId>) -> AppResult<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.user_store.find_by_id(id)? {
                Some(user) => users.push(user),
                None => warn!("Friend edge points at missing user {}", id),
            }
        }
        debug!("Hydrated {} users", users.len());
        Ok(users)
    }

    fn require_user(&self, id: UserId) -> AppResult<User> {
        self.user_store
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    fn ensure_user_exists(&self, id: UserId) -> AppResult<()> {
        if !self.user_store.exists_by_id(id)? {
            return Err(AppError::not_found("User", id));
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
