// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod entity_locks;
pub mod film_catalog_service;
pub mod social_graph_service;
pub mod statistics_service;

#[cfg(test)]
mod social_graph_service_tests;

pub use entity_locks::EntityLocks;
pub use film_catalog_service::FilmCatalogService;
pub use social_graph_service::SocialGraphService;
pub use statistics_service::StatisticsService;
