// src/main.rs
//
// Opens the configured storage, makes sure the schema and reference data are
// in place, and reports what the catalogue currently holds.

use anyhow::Context;
use log::info;

use filmcircle::{bootstrap, AppConfig, ReferenceCatalog};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. CONFIGURATION
    let config = AppConfig::from_env().context("invalid configuration")?;

    // 2. STORAGE + SERVICES
    let state = bootstrap(&config).context("failed to start storage backend")?;

    // 3. REPORT
    let genres = state.catalog.all_genres()?;
    let ratings = state.catalog.all_maturity_ratings()?;
    info!(
        "Reference catalog: {} genres, {} maturity ratings",
        genres.len(),
        ratings.len()
    );

    let stats = state.statistics_service.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
