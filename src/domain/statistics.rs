// src/domain/statistics.rs

use serde::{Deserialize, Serialize};

/// Aggregate counters over the whole catalog.
/// Always derived from the stores, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub film_count: u64,
    pub user_count: u64,
    pub total_likes: u64,
    /// Directed friendship edges, pending and confirmed alike
    pub total_friendships: u64,
}
