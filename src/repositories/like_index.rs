// src/repositories/like_index.rs
//
// Many-to-many "liked" relation between films and users.
// Film and user existence is the caller's concern.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use crate::domain::{FilmId, UserId};
use crate::error::AppResult;

/// Every like at a single instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeSnapshot {
    likes: HashMap<FilmId, BTreeSet<UserId>>,
}

impl LikeSnapshot {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (FilmId, UserId)>) -> Self {
        let mut likes: HashMap<FilmId, BTreeSet<UserId>> = HashMap::new();
        for (film_id, user_id) in pairs {
            likes.entry(film_id).or_default().insert(user_id);
        }
        Self { likes }
    }

    pub fn count(&self, film_id: FilmId) -> usize {
        self.likes.get(&film_id).map_or(0, BTreeSet::len)
    }

    pub fn likers(&self, film_id: FilmId) -> BTreeSet<UserId> {
        self.likes.get(&film_id).cloned().unwrap_or_default()
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait LikeIndex: Send + Sync {
    /// Idempotent: liking twice is not an error. Returns whether a like was added.
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool>;
    /// Idempotent: removing an absent like is not an error. Returns whether one was removed.
    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool>;
    /// Drop every like of a deleted film; returns how many went
    fn remove_film(&self, film_id: FilmId) -> AppResult<u64>;
    /// Drop every like given by a deleted user; returns how many went
    fn remove_user(&self, user_id: UserId) -> AppResult<u64>;
    fn like_count(&self, film_id: FilmId) -> AppResult<usize>;
    fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>>;
    /// All likes read at one instant, for ranking
    fn snapshot(&self) -> AppResult<LikeSnapshot>;
    fn total_likes(&self) -> AppResult<u64>;
}

#[derive(Default)]
pub struct InMemoryLikeIndex {
    likes: RwLock<HashMap<FilmId, BTreeSet<UserId>>>,
}

impl InMemoryLikeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeIndex for InMemoryLikeIndex {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .likes
            .write()?
            .entry(film_id)
            .or_default()
            .insert(user_id))
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        let mut likes = self.likes.write()?;
        let Some(users) = likes.get_mut(&film_id) else {
            return Ok(false);
        };
        let removed = users.remove(&user_id);
        if users.is_empty() {
            likes.remove(&film_id);
        }
        Ok(removed)
    }

    fn remove_film(&self, film_id: FilmId) -> AppResult<u64> {
        Ok(self
            .likes
            .write()?
            .remove(&film_id)
            .map_or(0, |users| users.len() as u64))
    }

    fn remove_user(&self, user_id: UserId) -> AppResult<u64> {
        let mut likes = self.likes.write()?;
        let mut removed = 0;
        likes.retain(|_, users| {
            if users.remove(&user_id) {
                removed += 1;
            }
            !users.is_empty()
        });
        Ok(removed)
    }

    fn like_count(&self, film_id: FilmId) -> AppResult<usize> {
        Ok(self.likes.read()?.get(&film_id).map_or(0, BTreeSet::len))
    }

    fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>> {
        Ok(self
            .likes
            .read()?
            .get(&film_id)
            .cloned()
            .unwrap_or_default())
    }

    fn snapshot(&self) -> AppResult<LikeSnapshot> {
        Ok(LikeSnapshot {
            likes: self.likes.read()?.clone(),
        })
    }

    fn total_likes(&self) -> AppResult<u64> {
        Ok(self
            .likes
            .read()?
            .values()
            .map(|users| users.len() as u64)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_add_like_is_idempotent() {
        let index = InMemoryLikeIndex::new();
        assert!(index.add_like(1, 10).unwrap());
        assert!(!index.add_like(1, 10).unwrap());

        assert_eq!(index.like_count(1).unwrap(), 1);
        assert_eq!(index.total_likes().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_like_is_noop() {
        let index = InMemoryLikeIndex::new();
        index.add_like(1, 10).unwrap();

        assert!(!index.remove_like(1, 11).unwrap());
        assert!(!index.remove_like(2, 10).unwrap());

        assert_eq!(index.likers_of(1).unwrap(), BTreeSet::from([10]));
        assert_eq!(index.like_count(2).unwrap(), 0);
    }

    #[test]
    fn test_remove_film_and_user_purge_their_likes() {
        let index = InMemoryLikeIndex::new();
        for (film, user) in [(1, 10), (1, 11), (2, 10), (3, 12)] {
            index.add_like(film, user).unwrap();
        }

        assert_eq!(index.remove_user(10).unwrap(), 2);
        assert_eq!(index.likers_of(1).unwrap(), BTreeSet::from([11]));
        assert_eq!(index.like_count(2).unwrap(), 0);

        assert_eq!(index.remove_film(1).unwrap(), 1);
        assert_eq!(index.remove_film(1).unwrap(), 0);
        assert_eq!(index.total_likes().unwrap(), 1);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_writes() {
        let index = InMemoryLikeIndex::new();
        index.add_like(1, 10).unwrap();
        let snapshot = index.snapshot().unwrap();

        index.add_like(1, 11).unwrap();

        assert_eq!(snapshot.count(1), 1);
        assert_eq!(index.like_count(1).unwrap(), 2);
    }

    #[test]
    fn test_snapshot_from_pairs_groups_by_film() {
        let snapshot = LikeSnapshot::from_pairs([(1, 10), (1, 11), (2, 10), (1, 10)]);
        assert_eq!(snapshot.count(1), 2);
        assert_eq!(snapshot.likers(2), BTreeSet::from([10]));
        assert_eq!(snapshot.count(3), 0);
    }

    #[test]
    fn test_concurrent_likes_on_same_pair() {
        let index = Arc::new(InMemoryLikeIndex::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    for _ in 0..100 {
                        if i % 2 == 0 {
                            index.add_like(1, 10).unwrap();
                        } else {
                            index.remove_like(1, 10).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let count = index.like_count(1).unwrap();
        assert!(count <= 1, "like set must never hold duplicates, got {}", count);
    }
}
