use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("email address is not valid: {0}")]
    InvalidEmail(String),

    #[error("first name cannot be empty")]
    EmptyFirstName,

    #[error("last name cannot be empty")]
    EmptyLastName,
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// A registered account.
///
/// The password hash is an opaque PHC-formatted string produced by the
/// services layer; this type never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with zeroed streaks and no login history.
    ///
    /// # Errors
    ///
    /// Returns `UserError::InvalidEmail` if the email is empty or has no `@`,
    /// and `UserError::EmptyFirstName`/`EmptyLastName` for blank names.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        avatar_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, UserError> {
        let email = email.into().trim().to_owned();
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::InvalidEmail(email));
        }

        let first_name = first_name.into().trim().to_owned();
        if first_name.is_empty() {
            return Err(UserError::EmptyFirstName);
        }

        let last_name = last_name.into().trim().to_owned();
        if last_name.is_empty() {
            return Err(UserError::EmptyLastName);
        }

        Ok(Self {
            id,
            email,
            password_hash: password_hash.into(),
            first_name,
            last_name,
            avatar_url,
            is_active: true,
            last_login: None,
            current_streak: 0,
            longest_streak: 0,
            created_at,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn new_user_starts_active_with_no_history() {
        let user = User::new(
            UserId::new(1),
            "ada@example.com",
            "$argon2id$stub",
            "Ada",
            "Lovelace",
            None,
            fixed_now(),
        )
        .unwrap();

        assert!(user.is_active);
        assert_eq!(user.last_login, None);
        assert_eq!(user.current_streak, 0);
        assert_eq!(user.longest_streak, 0);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn rejects_email_without_at_sign() {
        let err = User::new(
            UserId::new(1),
            "not-an-email",
            "h",
            "Ada",
            "Lovelace",
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, UserError::InvalidEmail(_)));
    }

    #[test]
    fn rejects_blank_names() {
        let err = User::new(
            UserId::new(1),
            "ada@example.com",
            "h",
            "   ",
            "Lovelace",
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, UserError::EmptyFirstName);

        let err = User::new(
            UserId::new(1),
            "ada@example.com",
            "h",
            "Ada",
            "",
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, UserError::EmptyLastName);
    }

    #[test]
    fn trims_email_and_names() {
        let user = User::new(
            UserId::new(1),
            "  ada@example.com  ",
            "h",
            " Ada ",
            " Lovelace ",
            None,
            fixed_now(),
        )
        .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
    }
}
