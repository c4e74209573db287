use std::sync::Arc;

use lms_core::model::{User, UserId};
use storage::repository::{NewUserRecord, StorageError, UserRepository};

use crate::Clock;
use crate::auth::{self, MIN_PASSWORD_LEN};
use crate::error::UserServiceError;

/// Account-creation input. The password arrives in plaintext and is hashed
/// before anything is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// Orchestrates account creation and login.
#[derive(Clone)]
pub struct UserService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, users }
    }

    /// Create a new account with an Argon2id-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::WeakPassword` for a too-short password,
    /// `UserServiceError::User` for invalid profile fields,
    /// `UserServiceError::EmailTaken` when the email is registered already,
    /// and `UserServiceError::Storage` if persistence fails.
    pub async fn create_user(&self, input: NewUser) -> Result<UserId, UserServiceError> {
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(UserServiceError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = auth::hash_password(&input.password)
            .map_err(|e| UserServiceError::PasswordHash(e.to_string()))?;

        let now = self.clock.now();
        let user = User::new(
            UserId::new(0),
            input.email,
            password_hash,
            input.first_name,
            input.last_name,
            input.avatar_url,
            now,
        )?;

        match self
            .users
            .insert_new_user(NewUserRecord::from_user(&user))
            .await
        {
            Ok(id) => Ok(id),
            Err(StorageError::Conflict) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and stamp the login time.
    ///
    /// Unknown email and wrong password are deliberately indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::InvalidCredentials` when the credentials do
    /// not check out, and `UserServiceError::Storage` if repository access
    /// fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, UserServiceError> {
        let Some(mut user) = self.users.find_user_by_email(email.trim()).await? else {
            tracing::warn!("login attempt for unknown email");
            return Err(UserServiceError::InvalidCredentials);
        };

        let matches = auth::verify_password(password, &user.password_hash)
            .map_err(|e| UserServiceError::PasswordHash(e.to_string()))?;
        if !matches {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(UserServiceError::InvalidCredentials);
        }

        let now = self.clock.now();
        self.users.record_login(user.id, now).await?;
        user.last_login = Some(now);
        Ok(user)
    }

    /// Fetch a user by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Storage` if repository access fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, UserServiceError> {
        let user = self.users.get_user(id).await?;
        Ok(user)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
