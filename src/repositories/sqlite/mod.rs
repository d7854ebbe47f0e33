// src/repositories/sqlite/mod.rs
//
// Relational backend. Each repository borrows connections from the shared
// pool; multi-row writes run inside one transaction.

pub mod sqlite_film_store;
pub mod sqlite_friendship_graph;
pub mod sqlite_like_index;
pub mod sqlite_reference_catalog;
pub mod sqlite_user_store;

pub use sqlite_film_store::SqliteFilmStore;
pub use sqlite_friendship_graph::SqliteFriendshipGraph;
pub use sqlite_like_index::SqliteLikeIndex;
pub use sqlite_reference_catalog::SqliteReferenceCatalog;
pub use sqlite_user_store::SqliteUserStore;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;

/// Dates are stored as ISO-8601 text
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read an optional ISO date column
pub(crate) fn optional_date_column(row: &Row, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(column)?;
    text.map(|value| {
        NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|e| {
            let index = row.as_ref().column_index(column).unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        })
    })
    .transpose()
}

/// Read a required ISO date column
pub(crate) fn date_column(row: &Row, column: &str) -> rusqlite::Result<NaiveDate> {
    optional_date_column(row, column)?.ok_or_else(|| rusqlite::Error::InvalidColumnType(
        row.as_ref().column_index(column).unwrap_or_default(),
        column.to_string(),
        Type::Null,
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::db::{create_connection_pool, get_connection, initialize_database, ConnectionPool};

    /// Fresh on-disk database; keep the TempDir alive for the test's duration
    pub fn test_pool() -> (TempDir, Arc<ConnectionPool>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("test.db"), 4).unwrap();
        {
            let conn = get_connection(&pool).unwrap();
            initialize_database(&conn).unwrap();
        }
        (dir, Arc::new(pool))
    }
}
