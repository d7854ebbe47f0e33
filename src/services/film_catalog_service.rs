// src/services/film_catalog_service.rs
//
// Film orchestration: validation, catalog integrity checks, partial-update
// merge, likes and popularity ranking.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::{
    DomainError, Film, FilmDetails, FilmId, FilmPatch, Genre, MaturityRating, NewFilm, User,
    UserId,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{EntityStore, LikeIndex, LikeSnapshot, ReferenceCatalog};
use crate::services::entity_locks::EntityLocks;

pub struct FilmCatalogService {
    film_store: Arc<dyn EntityStore<Film>>,
    user_store: Arc<dyn EntityStore<User>>,
    like_index: Arc<dyn LikeIndex>,
    catalog: Arc<dyn ReferenceCatalog>,
    write_locks: EntityLocks,
}

impl FilmCatalogService {
    pub fn new(
        film_store: Arc<dyn EntityStore<Film>>,
        user_store: Arc<dyn EntityStore<User>>,
        like_index: Arc<dyn LikeIndex>,
        catalog: Arc<dyn ReferenceCatalog>,
    ) -> Self {
        Self {
            film_store,
            user_store,
            like_index,
            catalog,
            write_locks: EntityLocks::new(),
        }
    }

    /// Validate a full draft, check its catalog references and persist it.
    /// Nothing is written unless every check passes.
    pub fn create(&self, draft: NewFilm) -> AppResult<FilmDetails> {
        let film = draft.into_film().inspect_err(|e| warn!("Film rejected: {}", e))?;
        let (genres, maturity_rating) = self
            .resolve_classification(&film)
            .inspect_err(|e| warn!("Film '{}' rejected: {}", film.title, e))?;

        let saved = self.film_store.create(film)?;
        info!("Film created: id={}, title='{}'", saved.id, saved.title);

        Ok(FilmDetails {
            film: saved,
            genres,
            maturity_rating,
            liked_by: BTreeSet::new(),
            popularity: 0,
        })
    }

    /// Apply only the fields present in `patch`.
    ///
    /// The merge happens on a copy and is written back in one store call, so
    /// any validation or catalog failure leaves the stored film untouched.
    /// Concurrent updates of the same film are serialized.
    pub fn update(&self, id: FilmId, patch: FilmPatch) -> AppResult<FilmDetails> {
        self.write_locks.with_lock(id, || {
            let current = self.require_film(id)?;
            if patch.is_empty() {
                debug!("Empty patch for film {}", id);
                return self.hydrate_one(current);
            }

            let reclassified = patch.touches_classification();
            let merged = current
                .apply_patch(patch)
                .inspect_err(|e| warn!("Update of film {} rejected: {}", id, e))?;
            let (genres, maturity_rating) = self
                .resolve_classification(&merged)
                .inspect_err(|e| warn!("Update of film {} rejected: {}", id, e))?;

            let saved = self.film_store.update(merged)?;
            info!(
                "Film updated: id={}{}",
                saved.id,
                if reclassified { " (classification changed)" } else { "" }
            );

            let liked_by = self.like_index.likers_of(id)?;
            Ok(FilmDetails {
                popularity: liked_by.len(),
                film: saved,
                genres,
                maturity_rating,
                liked_by,
            })
        })
    }

    pub fn find_by_id(&self, id: FilmId) -> AppResult<FilmDetails> {
        let film = self.require_film(id)?;
        self.hydrate_one(film)
    }

    /// Every film, ordered by id
    pub fn find_all(&self) -> AppResult<Vec<FilmDetails>> {
        let snapshot = self.like_index.snapshot()?;
        self.film_store
            .find_all()?
            .into_iter()
            .map(|film| self.hydrate(film, &snapshot))
            .collect()
    }

    pub fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>> {
        self.ensure_film_exists(film_id)?;
        self.like_index.likers_of(film_id)
    }

    pub fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        self.ensure_film_exists(film_id)?;
        self.ensure_user_exists(user_id)?;

        if self.like_index.add_like(film_id, user_id)? {
            info!("Like added: film={}, user={}", film_id, user_id);
        } else {
            debug!("Like already present: film={}, user={}", film_id, user_id);
        }
        Ok(())
    }

    pub fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        self.ensure_film_exists(film_id)?;
        self.ensure_user_exists(user_id)?;

        if self.like_index.remove_like(film_id, user_id)? {
            info!("Like removed: film={}, user={}", film_id, user_id);
        } else {
            debug!("No like to remove: film={}, user={}", film_id, user_id);
        }
        Ok(())
    }

    /// Delete a film together with every like it received
    pub fn delete(&self, id: FilmId) -> AppResult<()> {
        self.write_locks.with_lock(id, || {
            self.ensure_film_exists(id)?;
            self.film_store.delete(id)?;
            let dropped = self.like_index.remove_film(id)?;
            info!("Film deleted: id={} ({} likes dropped)", id, dropped);
            Ok(())
        })
    }

    /// Up to `count` films by like count, most liked first.
    /// Equal counts are ordered by film id, highest id first.
    /// All counts come from one like snapshot.
    pub fn popular_films(&self, count: usize) -> AppResult<Vec<FilmDetails>> {
        if count == 0 {
            return Err(DomainError::invalid("count", "count must be positive").into());
        }

        let snapshot = self.like_index.snapshot()?;
        let mut films = self.film_store.find_all()?;
        rank_by_popularity(&mut films, &snapshot);
        films.truncate(count);

        debug!("Popular films: requested {}, returning {}", count, films.len());
        films
            .into_iter()
            .map(|film| self.hydrate(film, &snapshot))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Look up every catalog id the film points at; any miss fails the whole call
    fn resolve_classification(&self, film: &Film) -> AppResult<(Vec<Genre>, Option<MaturityRating>)> {
        let genres = self.catalog.genres(&film.genre_ids)?;
        let maturity_rating = film
            .maturity_rating_id
            .map(|id| self.catalog.maturity_rating(id))
            .transpose()?;
        Ok((genres, maturity_rating))
    }

    fn hydrate_one(&self, film: Film) -> AppResult<FilmDetails> {
        let (genres, maturity_rating) = self.resolve_classification(&film)?;
        let liked_by = self.like_index.likers_of(film.id)?;
        Ok(FilmDetails {
            popularity: liked_by.len(),
            film,
            genres,
            maturity_rating,
            liked_by,
        })
    }

    fn hydrate(&self, film: Film, snapshot: &LikeSnapshot) -> AppResult<FilmDetails> {
        let (genres, maturity_rating) = self.resolve_classification(&film)?;
        let liked_by = snapshot.likers(film.id);
        Ok(FilmDetails {
            popularity: liked_by.len(),
            film,
            genres,
            maturity_rating,
            liked_by,
        })
    }

    fn require_film(&self, id: FilmId) -> AppResult<Film> {
        self.film_store
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found("Film", id))
    }

    fn ensure_film_exists(&self, id: FilmId) -> AppResult<()> {
        if !self.film_store.exists_by_id(id)? {
            return Err(AppError::not_found("Film", id));
        }
        Ok(())
    }

    fn ensure_user_exists(&self, id: UserId) -> AppResult<()> {
        if !self.user_store.exists_by_id(id)? {
            return Err(AppError::not_found("User", id));
        }
        Ok(())
    }
}

/// Like count descending, then id descending
fn rank_by_popularity(films: &mut [Film], snapshot: &LikeSnapshot) {
    films.sort_by(|a, b| {
        snapshot
            .count(b.id)
            .cmp(&snapshot.count(a.id))
            .then_with(|| b.id.cmp(&a.id))
    });
}
