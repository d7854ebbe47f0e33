// src/repositories/memory_store.rs
//
// Volatile entity store backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::entity_store::{Entity, EntityStore};
use crate::error::{AppError, AppResult};

struct StoreState<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

pub struct InMemoryStore<T> {
    state: RwLock<StoreState<T>>,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> StoreState<T> {
    /// Reject `entity` when another row already holds its unique key
    fn check_unique(&self, entity: &T) -> AppResult<()> {
        let Some((field, key)) = entity.unique_key() else {
            return Ok(());
        };
        let taken = self
            .rows
            .values()
            .any(|row| row.id() != entity.id() && row.unique_key() == Some((field, key)));
        if taken {
            return Err(AppError::Integrity(format!(
                "{} {} '{}' is already taken",
                T::KIND,
                field,
                key
            )));
        }
        Ok(())
    }
}

impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    fn create(&self, mut entity: T) -> AppResult<T> {
        let mut state = self.state.write()?;
        state.check_unique(&entity)?;
        let id = state.next_id;
        state.next_id += 1;

        entity.assign_id(id);
        state.rows.insert(id, entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: T) -> AppResult<T> {
        let mut state = self.state.write()?;
        if state.rows.contains_key(&entity.id()) {
            state.check_unique(&entity)?;
        }
        match state.rows.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(AppError::not_found(T::KIND, entity.id())),
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<T>> {
        Ok(self.state.read()?.rows.get(&id).cloned())
    }

    fn find_all(&self) -> AppResult<Vec<T>> {
        Ok(self.state.read()?.rows.values().cloned().collect())
    }

    fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.read()?.rows.contains_key(&id))
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        self.state.write()?.rows.remove(&id);
        Ok(())
    }

    fn count(&self) -> AppResult<u64> {
        Ok(self.state.read()?.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::error::ErrorKind;

    fn user(login: &str) -> User {
        User {
            id: 0,
            email: format!("{}@example.com", login),
            login: login.to_string(),
            display_name: login.to_string(),
            birthday: None,
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let store = InMemoryStore::<User>::new();
        let first = store.create(user("one")).unwrap();
        let second = store.create(user("two")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = InMemoryStore::<User>::new();
        let mut ghost = user("ghost");
        ghost.id = 42;

        let err = store.update(ghost).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_email_is_integrity_error() {
        let store = InMemoryStore::<User>::new();
        store.create(user("hopper")).unwrap();

        let mut twin = user("grace");
        twin.email = "hopper@example.com".to_string();
        let err = store.create(twin).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_update_cannot_take_another_users_email() {
        let store = InMemoryStore::<User>::new();
        store.create(user("hopper")).unwrap();
        let mut grace = store.create(user("grace")).unwrap();

        // Keeping one's own email is fine
        store.update(grace.clone()).unwrap();

        grace.email = "hopper@example.com".to_string();
        let err = store.update(grace.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert_eq!(
            store.find_by_id(grace.id).unwrap().unwrap().email,
            "grace@example.com"
        );
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryStore::<User>::new();
        let first = store.create(user("one")).unwrap();
        store.delete(first.id).unwrap();

        let second = store.create(user("two")).unwrap();
        assert_eq!(second.id, 2);
        assert!(!store.exists_by_id(first.id).unwrap());
        assert_eq!(store.find_all().unwrap(), vec![second]);
    }
}
