// src/services/statistics_service.rs
use std::sync::Arc;

use crate::domain::{CatalogStatistics, Film, User};
use crate::error::AppResult;
use crate::repositories::{EntityStore, FriendshipGraph, LikeIndex};

/// Derived counters over films, users and both relations
pub struct StatisticsService {
    film_store: Arc<dyn EntityStore<Film>>,
    user_store: Arc<dyn EntityStore<User>>,
    like_index: Arc<dyn LikeIndex>,
    friendships: Arc<dyn FriendshipGraph>,
}

impl StatisticsService {
    pub fn new(
        film_store: Arc<dyn EntityStore<Film>>,
        user_store: Arc<dyn EntityStore<User>>,
        like_index: Arc<dyn LikeIndex>,
        friendships: Arc<dyn FriendshipGraph>,
    ) -> Self {
        Self {
            film_store,
            user_store,
            like_index,
            friendships,
        }
    }

    pub fn snapshot(&self) -> AppResult<CatalogStatistics> {
        Ok(CatalogStatistics {
            film_count: self.film_store.count()?,
            user_count: self.user_store.count()?,
            total_likes: self.like_index.total_likes()?,
            total_friendships: self.friendships.edge_count()?,
        })
    }
}
