// src/repositories/entity_store.rs

use crate::domain::{Film, User};
use crate::error::AppResult;

/// Anything a store can hold: cloneable, with a store-assigned integer id
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in not-found errors
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn assign_id(&mut self, id: i64);

    /// Value that must be unique across the store, with the field it came from
    fn unique_key(&self) -> Option<(&'static str, &str)> {
        None
    }
}

/// CRUD contract shared by every backend
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Persist a new entity and return it with its assigned id
    fn create(&self, entity: T) -> AppResult<T>;
    /// Replace an existing entity; NotFound if its id is unknown
    fn update(&self, entity: T) -> AppResult<T>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<T>>;
    /// All entities ordered by id
    fn find_all(&self) -> AppResult<Vec<T>>;
    fn exists_by_id(&self, id: i64) -> AppResult<bool>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn count(&self) -> AppResult<u64>;
}

impl Entity for Film {
    const KIND: &'static str = "Film";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn unique_key(&self) -> Option<(&'static str, &str)> {
        Some(("email", &self.email))
    }
}
