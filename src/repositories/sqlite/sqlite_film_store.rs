// src/repositories/sqlite/sqlite_film_store.rs
//
// Films plus their genre links. The genre set is rewritten inside the same
// transaction as the film row, so readers never observe a half-written set.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rusqlite::{params, Connection, Row};

use super::{date_column, date_to_sql};
use crate::db::ConnectionPool;
use crate::domain::{Film, FilmId, GenreId};
use crate::error::{AppError, AppResult};
use crate::repositories::EntityStore;

pub struct SqliteFilmStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteFilmStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Film (genre ids are loaded separately)
    fn row_to_film(row: &Row) -> Result<Film, rusqlite::Error> {
        Ok(Film {
            id: row.get("id")?,
            title: row.get("title")?,
            synopsis: row.get("synopsis")?,
            release_date: date_column(row, "release_date")?,
            runtime_minutes: row.get("runtime_minutes")?,
            maturity_rating_id: row.get("maturity_rating_id")?,
            genre_ids: BTreeSet::new(),
        })
    }

    fn load_genre_ids(conn: &Connection, film_id: FilmId) -> AppResult<BTreeSet<GenreId>> {
        let mut stmt =
            conn.prepare("SELECT genre_id FROM film_genres WHERE film_id = ?1 ORDER BY genre_id")?;
        let ids = stmt
            .query_map(params![film_id], |row| row.get(0))?
            .collect::<Result<BTreeSet<GenreId>, _>>()?;
        Ok(ids)
    }

    /// Replace the genre links of `film`
    fn write_genre_ids(conn: &Connection, film: &Film) -> AppResult<()> {
        conn.execute("DELETE FROM film_genres WHERE film_id = ?1", params![film.id])?;

        let mut stmt = conn.prepare("INSERT INTO film_genres (film_id, genre_id) VALUES (?1, ?2)")?;
        for genre_id in &film.genre_ids {
            stmt.execute(params![film.id, genre_id])?;
        }
        Ok(())
    }
}

impl EntityStore<Film> for SqliteFilmStore {
    fn create(&self, mut film: Film) -> AppResult<Film> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO films (title, synopsis, release_date, runtime_minutes, maturity_rating_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                film.title,
                film.synopsis,
                date_to_sql(film.release_date),
                film.runtime_minutes,
                film.maturity_rating_id,
            ],
        )?;
        film.id = tx.last_insert_rowid();
        Self::write_genre_ids(&tx, &film)?;

        tx.commit()?;
        Ok(film)
    }

    fn update(&self, film: Film) -> AppResult<Film> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let rows_affected = tx.execute(
            "UPDATE films
             SET title = ?1, synopsis = ?2, release_date = ?3, runtime_minutes = ?4,
                 maturity_rating_id = ?5
             WHERE id = ?6",
            params![
                film.title,
                film.synopsis,
                date_to_sql(film.release_date),
                film.runtime_minutes,
                film.maturity_rating_id,
                film.id,
            ],
        )?;
        if rows_affected == 0 {
            return Err(AppError::not_found("Film", film.id));
        }
        Self::write_genre_ids(&tx, &film)?;

        tx.commit()?;
        Ok(film)
    }

    fn find_by_id(&self, id: FilmId) -> AppResult<Option<Film>> {
        let mut conn = self.pool.get()?;
        // Film row and genre links must come from the same snapshot
        let tx = conn.transaction()?;

        let found = {
            let mut stmt = tx.prepare(
                "SELECT id, title, synopsis, release_date, runtime_minutes, maturity_rating_id
                 FROM films WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], Self::row_to_film) {
                Ok(film) => Some(film),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            }
        };

        let film = match found {
            Some(mut film) => {
                film.genre_ids = Self::load_genre_ids(&tx, id)?;
                Some(film)
            }
            None => None,
        };
        tx.commit()?;
        Ok(film)
    }

    fn find_all(&self) -> AppResult<Vec<Film>> {
        let mut conn = self.pool.get()?;
        // One read transaction so the films and their genre links agree
        let tx = conn.transaction()?;

        let mut films: Vec<Film> = {
            let mut stmt = tx.prepare(
                "SELECT id, title, synopsis, release_date, runtime_minutes, maturity_rating_id
                 FROM films
                 ORDER BY id",
            )?;
            let rows = stmt.query_map([], Self::row_to_film)?;
            let films = rows.collect::<Result<Vec<_>, _>>()?;
            films
        };

        let mut genres_by_film: HashMap<FilmId, BTreeSet<GenreId>> = HashMap::new();
        {
            let mut stmt = tx.prepare("SELECT film_id, genre_id FROM film_genres")?;
            let links = stmt.query_map([], |row| {
                Ok((row.get::<_, FilmId>(0)?, row.get::<_, GenreId>(1)?))
            })?;
            for link in links {
                let (film_id, genre_id) = link?;
                genres_by_film.entry(film_id).or_default().insert(genre_id);
            }
        }
        tx.commit()?;

        for film in &mut films {
            film.genre_ids = genres_by_film.remove(&film.id).unwrap_or_default();
        }
        Ok(films)
    }

    fn exists_by_id(&self, id: FilmId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM films WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn delete(&self, id: FilmId) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM films WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn count(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM films", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
