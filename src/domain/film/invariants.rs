// src/domain/film/invariants.rs

use chrono::NaiveDate;

use super::entity::Film;
use crate::domain::{DomainError, DomainResult};

/// Earliest admissible release date: the first public film screening
pub const EARLIEST_RELEASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(date) => date,
    None => panic!("invalid earliest release date"),
};

pub const MAX_SYNOPSIS_CHARS: usize = 200;

/// Validates all Film invariants
pub fn validate_film(film: &Film) -> DomainResult<()> {
    validate_title(&film.title)?;
    validate_synopsis(film.synopsis.as_deref())?;
    validate_release_date(film.release_date)?;
    validate_runtime(film.runtime_minutes)?;
    Ok(())
}

pub(crate) fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::invalid("title", "title cannot be empty"));
    }
    Ok(())
}

/// Length is counted in characters, not bytes
pub(crate) fn validate_synopsis(synopsis: Option<&str>) -> DomainResult<()> {
    if let Some(text) = synopsis {
        let length = text.chars().count();
        if length > MAX_SYNOPSIS_CHARS {
            return Err(DomainError::invalid(
                "synopsis",
                format!(
                    "synopsis is {} characters, the maximum is {}",
                    length, MAX_SYNOPSIS_CHARS
                ),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_release_date(release_date: NaiveDate) -> DomainResult<()> {
    if release_date < EARLIEST_RELEASE_DATE {
        return Err(DomainError::invalid(
            "release_date",
            format!(
                "release date {} is before {}",
                release_date, EARLIEST_RELEASE_DATE
            ),
        ));
    }
    Ok(())
}

pub(crate) fn validate_runtime(runtime_minutes: i32) -> DomainResult<()> {
    if runtime_minutes <= 0 {
        return Err(DomainError::invalid(
            "runtime_minutes",
            format!("runtime must be positive, got {}", runtime_minutes),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for the Film domain:
///
/// 1. Identity is assigned once by the store and never changes
/// 2. Title cannot be blank
/// 3. Synopsis is at most 200 characters
/// 4. Release date is not before 1895-12-28
/// 5. Runtime is strictly positive
/// 6. Genre and rating ids exist in the reference catalog at write time
///    (checked by the service, the entity cannot see the catalog)
