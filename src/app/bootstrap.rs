// src/app/bootstrap.rs
//
// Storage selection happens here and only here. Services never look up
// their collaborators; they receive them as `Arc<dyn Trait>`.

use std::sync::Arc;

use log::info;

use crate::app::AppState;
use crate::config::{AppConfig, StorageBackend};
use crate::db::{create_connection_pool, get_connection, initialize_database, verify_database_integrity};
use crate::domain::{Film, User};
use crate::error::AppResult;
use crate::repositories::{
    EntityStore, FriendshipGraph, InMemoryFriendshipGraph, InMemoryLikeIndex,
    InMemoryReferenceCatalog, InMemoryStore, LikeIndex, ReferenceCatalog, SqliteFilmStore,
    SqliteFriendshipGraph, SqliteLikeIndex, SqliteReferenceCatalog, SqliteUserStore,
};
use crate::services::{FilmCatalogService, SocialGraphService, StatisticsService};

/// One backend's worth of stores
struct Backend {
    films: Arc<dyn EntityStore<Film>>,
    users: Arc<dyn EntityStore<User>>,
    likes: Arc<dyn LikeIndex>,
    friendships: Arc<dyn FriendshipGraph>,
    catalog: Arc<dyn ReferenceCatalog>,
}

pub fn bootstrap(config: &AppConfig) -> AppResult<AppState> {
    let backend = match config.storage {
        StorageBackend::InMemory => in_memory_backend(),
        StorageBackend::Sqlite => sqlite_backend(config)?,
    };

    let film_service = Arc::new(FilmCatalogService::new(
        backend.films.clone(),
        backend.users.clone(),
        backend.likes.clone(),
        backend.catalog.clone(),
    ));
    let social_service = Arc::new(SocialGraphService::new(
        backend.users.clone(),
        backend.friendships.clone(),
        backend.likes.clone(),
    ));
    let statistics_service = Arc::new(StatisticsService::new(
        backend.films,
        backend.users,
        backend.likes,
        backend.friendships,
    ));

    info!("Services ready on {} storage", config.storage);

    Ok(AppState {
        backend: config.storage,
        film_service,
        social_service,
        statistics_service,
        catalog: backend.catalog,
    })
}

fn in_memory_backend() -> Backend {
    Backend {
        films: Arc::new(InMemoryStore::<Film>::new()),
        users: Arc::new(InMemoryStore::<User>::new()),
        likes: Arc::new(InMemoryLikeIndex::new()),
        friendships: Arc::new(InMemoryFriendshipGraph::new()),
        catalog: Arc::new(InMemoryReferenceCatalog::standard()),
    }
}

fn sqlite_backend(config: &AppConfig) -> AppResult<Backend> {
    let pool = Arc::new(create_connection_pool(&config.database_path, config.pool_size)?);

    // Schema setup is idempotent
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }
    info!("SQLite storage at {}", config.database_path.display());

    Ok(Backend {
        films: Arc::new(SqliteFilmStore::new(pool.clone())),
        users: Arc::new(SqliteUserStore::new(pool.clone())),
        likes: Arc::new(SqliteLikeIndex::new(pool.clone())),
        friendships: Arc::new(SqliteFriendshipGraph::new(pool.clone())),
        catalog: Arc::new(SqliteReferenceCatalog::new(pool)),
    })
}
