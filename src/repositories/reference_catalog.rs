// src/repositories/reference_catalog.rs
//
// Closed lookup tables for genres and maturity ratings.
// Unknown ids fail closed with NotFound.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Genre, GenreId, MaturityRating, MaturityRatingId};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait ReferenceCatalog: Send + Sync {
    fn genre(&self, id: GenreId) -> AppResult<Genre>;
    fn maturity_rating(&self, id: MaturityRatingId) -> AppResult<MaturityRating>;
    /// Ordered by id
    fn all_genres(&self) -> AppResult<Vec<Genre>>;
    /// Ordered by id
    fn all_maturity_ratings(&self) -> AppResult<Vec<MaturityRating>>;

    /// Resolve a whole genre set; the lowest unknown id is reported
    fn genres(&self, ids: &BTreeSet<GenreId>) -> AppResult<Vec<Genre>> {
        ids.iter().map(|id| self.genre(*id)).collect()
    }
}

pub struct InMemoryReferenceCatalog {
    genres: BTreeMap<GenreId, Genre>,
    ratings: BTreeMap<MaturityRatingId, MaturityRating>,
}

impl InMemoryReferenceCatalog {
    pub fn new(genres: Vec<Genre>, ratings: Vec<MaturityRating>) -> Self {
        Self {
            genres: genres.into_iter().map(|g| (g.id, g)).collect(),
            ratings: ratings.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// The stock catalog, identical to the rows seeded by `schema.sql`
    pub fn standard() -> Self {
        Self::new(
            vec![
                Genre::new(1, "Comedy"),
                Genre::new(2, "Drama"),
                Genre::new(3, "Animation"),
                Genre::new(4, "Thriller"),
                Genre::new(5, "Documentary"),
                Genre::new(6, "Action"),
            ],
            vec![
                MaturityRating::new(1, "G", "General audiences, no age restrictions"),
                MaturityRating::new(2, "PG", "Parental guidance suggested"),
                MaturityRating::new(3, "PG-13", "Not recommended for children under 13"),
                MaturityRating::new(4, "R", "Under 17 requires an accompanying adult"),
                MaturityRating::new(5, "NC-17", "No one 17 and under admitted"),
            ],
        )
    }
}

impl ReferenceCatalog for InMemoryReferenceCatalog {
    fn genre(&self, id: GenreId) -> AppResult<Genre> {
        self.genres
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Genre", id))
    }

    fn maturity_rating(&self, id: MaturityRatingId) -> AppResult<MaturityRating> {
        self.ratings
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("MaturityRating", id))
    }

    fn all_genres(&self) -> AppResult<Vec<Genre>> {
        Ok(self.genres.values().cloned().collect())
    }

    fn all_maturity_ratings(&self) -> AppResult<Vec<MaturityRating>> {
        Ok(self.ratings.values().cloned().collect())
    }
}
