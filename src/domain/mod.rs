// src/domain/mod.rs
//
// Domain Root - entities, invariants and pure state transitions.
//
// Nothing in here performs I/O. Services own orchestration,
// repositories own persistence.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod film;
pub mod friendship;
pub mod statistics;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Reference catalog entries
pub use catalog::{Genre, GenreId, MaturityRating, MaturityRatingId};

// Film Domain
pub use film::{validate_film, Film, FilmDetails, FilmId, FilmPatch, NewFilm, EARLIEST_RELEASE_DATE};

// User Domain
pub use user::{validate_user, NewUser, User, UserId, UserPatch};

// Friendship state machine
pub use friendship::{ensure_distinct_users, EdgePair, FriendshipStatus};

// Statistics (Derived Data)
pub use statistics::CatalogStatistics;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of local business rules; the caller can
/// always recover by resubmitting corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("User {user_id} cannot befriend themselves")]
    SelfFriendship { user_id: i64 },
}

impl DomainError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DomainError::InvalidField { field, .. } => Some(field),
            DomainError::SelfFriendship { .. } => None,
        }
    }
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
