// src/app/state.rs

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::repositories::ReferenceCatalog;
use crate::services::{FilmCatalogService, SocialGraphService, StatisticsService};

/// Fully wired services sharing one set of stores.
/// All fields are Arc-wrapped so the state can be cloned into worker threads.
#[derive(Clone)]
pub struct AppState {
    pub backend: StorageBackend,
    pub film_service: Arc<FilmCatalogService>,
    pub social_service: Arc<SocialGraphService>,
    pub statistics_service: Arc<StatisticsService>,
    pub catalog: Arc<dyn ReferenceCatalog>,
}
