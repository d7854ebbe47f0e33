// src/domain/film/entity.rs

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::invariants::{
    validate_film, validate_release_date, validate_runtime, validate_synopsis, validate_title,
};
use crate::domain::catalog::{Genre, GenreId, MaturityRating, MaturityRatingId};
use crate::domain::user::UserId;
use crate::domain::{DomainError, DomainResult};

pub type FilmId = i64;

/// A catalogued film as persisted by the film store.
/// Classification is stored as catalog ids only; likes live in the like index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Assigned by the store on creation, immutable afterwards (0 = unassigned)
    pub id: FilmId,

    pub title: String,

    /// At most 200 characters
    pub synopsis: Option<String>,

    /// Never before the first public screening (1895-12-28)
    pub release_date: NaiveDate,

    /// Strictly positive
    pub runtime_minutes: i32,

    pub maturity_rating_id: Option<MaturityRatingId>,

    /// Set semantics: ordered, no duplicates
    pub genre_ids: BTreeSet<GenreId>,
}

/// Payload for a full create. Every required field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFilm {
    pub title: String,
    pub synopsis: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<i32>,
    pub maturity_rating_id: Option<MaturityRatingId>,
    pub genre_ids: Vec<GenreId>,
}

/// Partial update. `None` means "leave untouched"; a present value is always
/// validated, whatever it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilmPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the synopsis
    pub synopsis: Option<Option<String>>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<i32>,
    /// `Some(None)` clears the rating
    pub maturity_rating_id: Option<Option<MaturityRatingId>>,
    /// Replaces the whole genre set
    pub genre_ids: Option<Vec<GenreId>>,
}

/// Film hydrated with its catalog entries and derived like data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmDetails {
    pub film: Film,
    pub genres: Vec<Genre>,
    pub maturity_rating: Option<MaturityRating>,
    pub liked_by: BTreeSet<UserId>,
    pub popularity: usize,
}

impl NewFilm {
    /// Validate the draft and turn it into an unsaved Film
    pub fn into_film(self) -> DomainResult<Film> {
        validate_title(&self.title)?;
        validate_synopsis(self.synopsis.as_deref())?;

        let release_date = self
            .release_date
            .ok_or_else(|| DomainError::invalid("release_date", "release date is required"))?;
        validate_release_date(release_date)?;

        let runtime_minutes = self
            .runtime_minutes
            .ok_or_else(|| DomainError::invalid("runtime_minutes", "runtime is required"))?;
        validate_runtime(runtime_minutes)?;

        Ok(Film {
            id: 0,
            title: self.title,
            synopsis: self.synopsis,
            release_date,
            runtime_minutes,
            maturity_rating_id: self.maturity_rating_id,
            genre_ids: self.genre_ids.into_iter().collect(),
        })
    }
}

impl FilmPatch {
    /// True when the patch would re-point the film at catalog entries
    pub fn touches_classification(&self) -> bool {
        self.genre_ids.is_some() || self.maturity_rating_id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.synopsis.is_none()
            && self.release_date.is_none()
            && self.runtime_minutes.is_none()
            && !self.touches_classification()
    }
}

impl Film {
    /// Merge a patch into a copy of this film.
    ///
    /// Each supplied field is validated before it is merged; the receiver is
    /// never modified, so a failure leaves the caller holding the original.
    pub fn apply_patch(&self, patch: FilmPatch) -> DomainResult<Film> {
        let mut merged = self.clone();

        if let Some(title) = patch.title {
            validate_title(&title)?;
            merged.title = title;
        }
        if let Some(synopsis) = patch.synopsis {
            validate_synopsis(synopsis.as_deref())?;
            merged.synopsis = synopsis;
        }
        if let Some(release_date) = patch.release_date {
            validate_release_date(release_date)?;
            merged.release_date = release_date;
        }
        if let Some(runtime) = patch.runtime_minutes {
            validate_runtime(runtime)?;
            merged.runtime_minutes = runtime;
        }
        if let Some(rating) = patch.maturity_rating_id {
            merged.maturity_rating_id = rating;
        }
        if let Some(genres) = patch.genre_ids {
            merged.genre_ids = genres.into_iter().collect();
        }

        validate_film(&merged)?;
        Ok(merged)
    }
}

impl std::fmt::Display for Film {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.release_date)
    }
}
