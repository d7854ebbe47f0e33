pub mod entity;
pub mod invariants;

pub use entity::{Film, FilmDetails, FilmId, FilmPatch, NewFilm};
pub use invariants::{validate_film, EARLIEST_RELEASE_DATE, MAX_SYNOPSIS_CHARS};
