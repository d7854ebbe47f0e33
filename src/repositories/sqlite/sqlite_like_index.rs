// src/repositories/sqlite/sqlite_like_index.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use rusqlite::params;

use crate::db::ConnectionPool;
use crate::domain::{FilmId, UserId};
use crate::error::AppResult;
use crate::repositories::{LikeIndex, LikeSnapshot};

pub struct SqliteLikeIndex {
    pool: Arc<ConnectionPool>,
}

impl SqliteLikeIndex {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl LikeIndex for SqliteLikeIndex {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO film_likes (film_id, user_id) VALUES (?1, ?2)",
            params![film_id, user_id],
        )?;
        Ok(inserted > 0)
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM film_likes WHERE film_id = ?1 AND user_id = ?2",
            params![film_id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Usually a no-op: deleting the film row already cascades
    fn remove_film(&self, film_id: FilmId) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM film_likes WHERE film_id = ?1", params![film_id])?;
        Ok(deleted as u64)
    }

    fn remove_user(&self, user_id: UserId) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM film_likes WHERE user_id = ?1", params![user_id])?;
        Ok(deleted as u64)
    }

    fn like_count(&self, film_id: FilmId) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM film_likes WHERE film_id = ?1",
            params![film_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT user_id FROM film_likes WHERE film_id = ?1")?;
        let likers = stmt
            .query_map(params![film_id], |row| row.get::<_, UserId>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(likers)
    }

    /// A single SELECT reads one consistent view of the table
    fn snapshot(&self) -> AppResult<LikeSnapshot> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT film_id, user_id FROM film_likes")?;
        let pairs = stmt
            .query_map([], |row| {
                Ok((row.get::<_, FilmId>(0)?, row.get::<_, UserId>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LikeSnapshot::from_pairs(pairs))
    }

    fn total_likes(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM film_likes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
