//! Authentication errors

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong email or password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Rejected signup/profile input
    #[error("{0}")]
    InvalidInput(String),

    /// Session cookie failed signature or payload checks
    #[error("invalid session token")]
    InvalidToken,

    /// Session cookie expired
    #[error("session expired")]
    TokenExpired,

    /// bcrypt failure
    #[error("password hash error")]
    Hash(#[from] bcrypt::BcryptError),

    /// Database error
    #[error("database error")]
    Db(#[from] arbor_db::DbError),
}
