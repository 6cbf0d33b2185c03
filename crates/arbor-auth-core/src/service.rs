//! Account service: registration, login, profile updates

use std::sync::Arc;

use arbor_db::{CreateUser, UpdateProfile, UserRepository, UserRow};
use arbor_types::UserId;
use uuid::Uuid;

use crate::AuthError;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Signup input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Account service over a user repository
#[derive(Clone)]
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new account service
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Register a new account and return its row.
    ///
    /// The email uniqueness pre-check races with concurrent signups; the
    /// unique index on `users.email` is the backstop.
    pub async fn register(&self, new_user: NewUser) -> Result<UserRow, AuthError> {
        let email = new_user.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput(
                "A valid email address is required.".to_string(),
            ));
        }
        if new_user.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)?;

        let user = self
            .users
            .create(CreateUser {
                id: Uuid::new_v4(),
                email,
                password_hash,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                is_staff: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Verify credentials and return the user row
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRow, AuthError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Fetch a user by id
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<UserRow>, AuthError> {
        Ok(self.users.find_by_id(user_id.0).await?)
    }

    /// Update profile fields, keeping emails unique
    pub async fn update_profile(
        &self,
        user_id: UserId,
        profile: UpdateProfile,
    ) -> Result<UserRow, AuthError> {
        let email = profile.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput(
                "A valid email address is required.".to_string(),
            ));
        }

        if let Some(existing) = self.users.find_by_email(&email).await? {
            if existing.id != user_id.0 {
                return Err(AuthError::EmailTaken);
            }
        }

        let user = self
            .users
            .update_profile(
                user_id.0,
                UpdateProfile {
                    email,
                    first_name: profile.first_name,
                    last_name: profile.last_name,
                },
            )
            .await?;

        Ok(user)
    }
}
