// src/domain/user/entity.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::invariants::{validate_birthday, validate_email, validate_login, validate_user};
use crate::domain::DomainResult;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store on creation, immutable afterwards (0 = unassigned)
    pub id: UserId,

    /// Non-empty, contains '@'
    pub email: String,

    /// Non-empty, no whitespace
    pub login: String,

    /// Falls back to the login when left blank
    pub display_name: String,

    /// Never in the future
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub login: String,
    pub display_name: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
    /// `Some(None)` clears the birthday
    pub birthday: Option<Option<NaiveDate>>,
}

impl NewUser {
    /// Validate the draft against `today` and build an unsaved User
    pub fn into_user(self, today: NaiveDate) -> DomainResult<User> {
        validate_email(&self.email)?;
        validate_login(&self.login)?;
        validate_birthday(self.birthday, today)?;

        let display_name = match self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.login.clone(),
        };

        Ok(User {
            id: 0,
            email: self.email,
            login: self.login,
            display_name,
            birthday: self.birthday,
        })
    }
}

impl User {
    /// Merge a patch into a copy of this user, validating every supplied field.
    /// A blank merged display name falls back to the merged login.
    pub fn apply_patch(&self, patch: UserPatch, today: NaiveDate) -> DomainResult<User> {
        let mut merged = self.clone();

        if let Some(email) = patch.email {
            validate_email(&email)?;
            merged.email = email;
        }
        if let Some(login) = patch.login {
            validate_login(&login)?;
            merged.login = login;
        }
        if let Some(display_name) = patch.display_name {
            merged.display_name = display_name;
        }
        if let Some(birthday) = patch.birthday {
            validate_birthday(birthday, today)?;
            merged.birthday = birthday;
        }

        if merged.display_name.trim().is_empty() {
            merged.display_name = merged.login.clone();
        }

        validate_user(&merged, today)?;
        Ok(merged)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.display_name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn stored_user() -> User {
        User {
            id: 1,
            email: "ada@example.com".to_string(),
            login: "ada".to_string(),
            display_name: "Ada Lovelace".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 12, 10),
        }
    }

    #[test]
    fn test_blank_display_name_defaults_to_login() {
        let draft = NewUser {
            email: "grace@example.com".to_string(),
            login: "grace".to_string(),
            display_name: Some("  ".to_string()),
            birthday: None,
        };
        let user = draft.into_user(today()).unwrap();
        assert_eq!(user.display_name, "grace");
    }

    #[test]
    fn test_missing_display_name_defaults_to_login() {
        let draft = NewUser {
            email: "grace@example.com".to_string(),
            login: "grace".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.into_user(today()).unwrap().display_name, "grace");
    }

    #[test]
    fn test_birthday_today_is_accepted() {
        let draft = NewUser {
            email: "new@example.com".to_string(),
            login: "newborn".to_string(),
            birthday: Some(today()),
            ..Default::default()
        };
        assert!(draft.into_user(today()).is_ok());
    }

    #[test]
    fn test_patch_blank_name_falls_back_to_patched_login() {
        let user = stored_user();
        let patch = UserPatch {
            login: Some("countess".to_string()),
            display_name: Some(String::new()),
            ..Default::default()
        };
        let merged = user.apply_patch(patch, today()).unwrap();
        assert_eq!(merged.login, "countess");
        assert_eq!(merged.display_name, "countess");
    }

    #[test]
    fn test_patch_only_email_keeps_rest() {
        let user = stored_user();
        let patch = UserPatch {
            email: Some("ada@analytical.engine".to_string()),
            ..Default::default()
        };
        let merged = user.apply_patch(patch, today()).unwrap();
        assert_eq!(merged.email, "ada@analytical.engine");
        assert_eq!(merged.login, user.login);
        assert_eq!(merged.display_name, user.display_name);
        assert_eq!(merged.birthday, user.birthday);
    }

    #[test]
    fn test_patch_rejects_login_with_whitespace() {
        let user = stored_user();
        let patch = UserPatch {
            login: Some("ada lovelace".to_string()),
            ..Default::default()
        };
        let err = user.apply_patch(patch, today()).unwrap_err();
        assert_eq!(err.field(), Some("login"));
    }

    #[test]
    fn test_patch_rejects_future_birthday() {
        let user = stored_user();
        let patch = UserPatch {
            birthday: Some(NaiveDate::from_ymd_opt(2024, 6, 2)),
            ..Default::default()
        };
        let err = user.apply_patch(patch, today()).unwrap_err();
        assert_eq!(err.field(), Some("birthday"));
    }
}
