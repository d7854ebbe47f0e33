// src/lib.rs
// FilmCircle - film catalogue with likes, friendships and reference data
//
// Architecture:
// - Domain-centric: validation and state transitions live in domain/
// - Explicit wiring: storage is chosen once in app::bootstrap
// - Two interchangeable backends: in-memory and SQLite
// - Services orchestrate; repositories persist; nothing else touches storage

pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    // Statistics
    CatalogStatistics,
    // Film
    Film,
    FilmDetails,
    FilmId,
    FilmPatch,
    // Friendship
    FriendshipStatus,
    // Catalog
    Genre,
    GenreId,
    MaturityRating,
    MaturityRatingId,
    // Film drafts
    NewFilm,
    // User
    NewUser,
    User,
    UserId,
    UserPatch,
};

// ============================================================================
// PUBLIC API - Errors, configuration, wiring
// ============================================================================

pub use app::{bootstrap, AppState};
pub use config::{AppConfig, StorageBackend};
pub use error::{AppError, AppResult, ErrorKind};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    Entity, EntityStore, FriendshipGraph, InMemoryFriendshipGraph, InMemoryLikeIndex,
    InMemoryReferenceCatalog, InMemoryStore, LikeIndex, ReferenceCatalog, SqliteFilmStore,
    SqliteFriendshipGraph, SqliteLikeIndex, SqliteReferenceCatalog, SqliteUserStore,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{FilmCatalogService, SocialGraphService, StatisticsService};
