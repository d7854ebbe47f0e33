// src/domain/user/invariants.rs

use chrono::NaiveDate;

use super::entity::User;
use crate::domain::{DomainError, DomainResult};

/// Validates all User invariants relative to `today`
pub fn validate_user(user: &User, today: NaiveDate) -> DomainResult<()> {
    validate_email(&user.email)?;
    validate_login(&user.login)?;
    validate_birthday(user.birthday, today)?;
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() {
        return Err(DomainError::invalid("email", "email cannot be empty"));
    }
    if !email.contains('@') {
        return Err(DomainError::invalid("email", "email must contain '@'"));
    }
    Ok(())
}

pub(crate) fn validate_login(login: &str) -> DomainResult<()> {
    if login.is_empty() {
        return Err(DomainError::invalid("login", "login cannot be empty"));
    }
    if login.chars().any(char::is_whitespace) {
        return Err(DomainError::invalid("login", "login cannot contain whitespace"));
    }
    Ok(())
}

pub(crate) fn validate_birthday(birthday: Option<NaiveDate>, today: NaiveDate) -> DomainResult<()> {
    if let Some(date) = birthday {
        if date > today {
            return Err(DomainError::invalid(
                "birthday",
                format!("birthday {} is in the future", date),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b").is_ok());
        assert_eq!(validate_email("").unwrap_err().field(), Some("email"));
        assert_eq!(validate_email("ada.example.com").unwrap_err().field(), Some("email"));
    }

    #[test]
    fn test_login_rules() {
        assert!(validate_login("ada_l").is_ok());
        assert!(validate_login("").is_err());
        assert!(validate_login("   ").is_err());
        assert!(validate_login("ada\tl").is_err());
    }
}
