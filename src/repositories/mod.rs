// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Stores are data mappers: no business validation
// - Relation indexes do not check that films/users exist
// - Every mutation is atomic on its own relation
// - Two interchangeable backends: in-memory and SQLite

pub mod entity_store;
pub mod friendship_graph;
pub mod like_index;
pub mod memory_store;
pub mod reference_catalog;
pub mod sqlite;

pub use entity_store::{Entity, EntityStore};
pub use friendship_graph::{FriendshipGraph, InMemoryFriendshipGraph};
pub use like_index::{InMemoryLikeIndex, LikeIndex, LikeSnapshot};
pub use memory_store::InMemoryStore;
pub use reference_catalog::{InMemoryReferenceCatalog, ReferenceCatalog};
pub use sqlite::{
    SqliteFilmStore, SqliteFriendshipGraph, SqliteLikeIndex, SqliteReferenceCatalog,
    SqliteUserStore,
};
