// src/repositories/sqlite/sqlite_user_store.rs

use std::sync::Arc;

use rusqlite::{params, Row};

use super::{date_to_sql, optional_date_column};
use crate::db::ConnectionPool;
use crate::domain::{User, UserId};
use crate::error::{AppError, AppResult};
use crate::repositories::EntityStore;

/// Users table. `email` is UNIQUE at the storage level; a duplicate
/// surfaces as an Integrity error.
pub struct SqliteUserStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get("id")?,
            email: row.get("email")?,
            login: row.get("login")?,
            display_name: row.get("display_name")?,
            birthday: optional_date_column(row, "birthday")?,
        })
    }
}

impl EntityStore<User> for SqliteUserStore {
    fn create(&self, mut user: User) -> AppResult<User> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (email, login, display_name, birthday) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.email,
                user.login,
                user.display_name,
                user.birthday.map(date_to_sql),
            ],
        )?;
        user.id = conn.last_insert_rowid();

        Ok(user)
    }

    fn update(&self, user: User) -> AppResult<User> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE users SET email = ?1, login = ?2, display_name = ?3, birthday = ?4
             WHERE id = ?5",
            params![
                user.email,
                user.login,
                user.display_name,
                user.birthday.map(date_to_sql),
                user.id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("User", user.id));
        }
        Ok(user)
    }

    fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, email, login, display_name, birthday FROM users WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, email, login, display_name, birthday FROM users ORDER BY id",
        )?;

        let users: Vec<User> = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn exists_by_id(&self, id: UserId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn delete(&self, id: UserId) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn count(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
