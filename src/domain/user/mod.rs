pub mod entity;
pub mod invariants;

pub use entity::{NewUser, User, UserId, UserPatch};
pub use invariants::validate_user;
