// src/repositories/sqlite/sqlite_friendship_graph.rs
//
// Friendship edges in the `friendships` table. Every transition reads and
// rewrites both directed edges inside an IMMEDIATE transaction, which takes
// the write lock up front and serializes concurrent requests.

use std::collections::BTreeSet;
use std::sync::Arc;

use rusqlite::{params, Connection, TransactionBehavior};

use crate::db::ConnectionPool;
use crate::domain::{ensure_distinct_users, EdgePair, FriendshipStatus, UserId};
use crate::error::{AppError, AppResult};
use crate::repositories::FriendshipGraph;

pub struct SqliteFriendshipGraph {
    pool: Arc<ConnectionPool>,
}

impl SqliteFriendshipGraph {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn transition(
        &self,
        actor: UserId,
        other: UserId,
        step: impl FnOnce(EdgePair) -> EdgePair,
    ) -> AppResult<(EdgePair, EdgePair)> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let before = EdgePair::new(
            read_status(&tx, actor, other)?,
            read_status(&tx, other, actor)?,
        );
        let after = step(before);
        if after != before {
            write_status(&tx, actor, other, after.forward)?;
            write_status(&tx, other, actor, after.reverse)?;
        }

        tx.commit()?;
        Ok((before, after))
    }
}

fn read_status(
    conn: &Connection,
    requester: UserId,
    target: UserId,
) -> AppResult<Option<FriendshipStatus>> {
    let mut stmt = conn.prepare(
        "SELECT status FROM friendships WHERE requester_id = ?1 AND target_id = ?2",
    )?;

    let text: Option<String> = match stmt.query_row(params![requester, target], |row| row.get(0)) {
        Ok(text) => Some(text),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e.into()),
    };

    text.map(|value| {
        FriendshipStatus::parse(&value)
            .ok_or_else(|| AppError::Internal(format!("Unknown friendship status '{}'", value)))
    })
    .transpose()
}

fn write_status(
    conn: &Connection,
    requester: UserId,
    target: UserId,
    status: Option<FriendshipStatus>,
) -> AppResult<()> {
    match status {
        Some(status) => {
            conn.execute(
                "INSERT INTO friendships (requester_id, target_id, status) VALUES (?1, ?2, ?3)
                 ON CONFLICT (requester_id, target_id) DO UPDATE SET status = excluded.status",
                params![requester, target, status.as_str()],
            )?;
        }
        None => {
            conn.execute(
                "DELETE FROM friendships WHERE requester_id = ?1 AND target_id = ?2",
                params![requester, target],
            )?;
        }
    }
    Ok(())
}

impl FriendshipGraph for SqliteFriendshipGraph {
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
        let conn = self.pool.get()?;
        read_status(&conn, requester, target)
    }

    fn friends_of(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT target_id FROM friendships WHERE requester_id = ?1 AND status = 'CONFIRMED'",
        )?;
        let friends = stmt
            .query_map(params![user_id], |row| row.get::<_, UserId>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(friends)
    }

    fn edge_count(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM friendships", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Usually a no-op: deleting the user row already cascades
    fn remove_user(&self, user_id: UserId) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM friendships WHERE requester_id = ?1 OR target_id = ?1",
            params![user_id],
        )?;
        Ok(deleted as u64)
    }
}
