// src/repositories/sqlite/sqlite_reference_catalog.rs

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::{Genre, GenreId, MaturityRating, MaturityRatingId};
use crate::error::{AppError, AppResult};
use crate::repositories::ReferenceCatalog;

/// Catalog rows seeded by the schema; read-only at runtime
pub struct SqliteReferenceCatalog {
    pool: Arc<ConnectionPool>,
}

impl SqliteReferenceCatalog {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_genre(row: &Row) -> Result<Genre, rusqlite::Error> {
        Ok(Genre {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    fn row_to_rating(row: &Row) -> Result<MaturityRating, rusqlite::Error> {
        Ok(MaturityRating {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }
}

impl ReferenceCatalog for SqliteReferenceCatalog {
    fn genre(&self, id: GenreId) -> AppResult<Genre> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name FROM genres WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_genre) {
            Ok(genre) => Ok(genre),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::not_found("Genre", id)),
            Err(e) => Err(e.into()),
        }
    }

    fn maturity_rating(&self, id: MaturityRatingId) -> AppResult<MaturityRating> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, name, description FROM maturity_ratings WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_rating) {
            Ok(rating) => Ok(rating),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(AppError::not_found("MaturityRating", id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn all_genres(&self) -> AppResult<Vec<Genre>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id")?;
        let genres = stmt
            .query_map([], Self::row_to_genre)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn all_maturity_ratings(&self) -> AppResult<Vec<MaturityRating>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name, description FROM maturity_ratings ORDER BY id")?;
        let ratings = stmt
            .query_map([], Self::row_to_rating)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repositories::sqlite::test_support::test_pool;
    use crate::repositories::InMemoryReferenceCatalog;

    #[test]
    fn test_seed_matches_standard_catalog() {
        let (_dir, pool) = test_pool();
        let catalog = SqliteReferenceCatalog::new(pool);
        let standard = InMemoryReferenceCatalog::standard();

        assert_eq!(catalog.all_genres().unwrap(), standard.all_genres().unwrap());
        assert_eq!(
            catalog.all_maturity_ratings().unwrap(),
            standard.all_maturity_ratings().unwrap()
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let (_dir, pool) = test_pool();
        let catalog = SqliteReferenceCatalog::new(pool);

        assert_eq!(catalog.genre(4).unwrap().name, "Thriller");
        assert_eq!(catalog.maturity_rating(3).unwrap().name, "PG-13");
        assert_eq!(catalog.genre(7).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(catalog.maturity_rating(6).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
