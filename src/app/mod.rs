// src/app/mod.rs
//
// Application wiring: picks a storage backend and assembles the services.

pub mod bootstrap;
pub mod state;

pub use bootstrap::bootstrap;
pub use state::AppState;
