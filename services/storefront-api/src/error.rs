//! Error types for the storefront API service.
//!
//! Every failure renders as JSON carrying a `success: false` flag, a
//! machine-readable code, and the human-readable message shown to the
//! shopper.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use arbor_auth_core::AuthError;
use arbor_cart_core::CartError;
use arbor_db::DbError;
use arbor_order_core::OrderError;

/// JSON failure body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Missing or failed authentication (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    Forbidden(String),

    /// State precondition failed (409)
    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error")]
    Db(#[from] DbError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Db(DbError::NotFound) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "PRECONDITION_FAILED",
            Self::Db(DbError::NotFound) => "NOT_FOUND",
            Self::Internal(_) | Self::Db(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorBody {
            success: false,
            code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::LoginRequired => Self::Unauthorized(err.to_string()),
            CartError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            CartError::Validation(message) => Self::BadRequest(message),
            CartError::Unauthorized => Self::Forbidden("Unauthorized action.".to_string()),
            CartError::Db(e) => Self::Db(e),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => Self::NotFound("order not found".to_string()),
            OrderError::EmptyCart => Self::Conflict(err.to_string()),
            OrderError::Validation(message) => Self::BadRequest(message),
            OrderError::Unauthorized => {
                Self::Forbidden("You do not have permission to perform this action.".to_string())
            }
            OrderError::Precondition(message) => Self::Conflict(message),
            OrderError::InvalidStatus(_) => Self::BadRequest("Invalid status provided.".to_string()),
            OrderError::Db(e) => Self::Db(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials.".to_string()),
            AuthError::EmailTaken => Self::BadRequest(err.to_string()),
            AuthError::InvalidInput(message) => Self::BadRequest(message),
            AuthError::InvalidToken | AuthError::TokenExpired => {
                Self::Unauthorized("Invalid or expired session.".to_string())
            }
            AuthError::Hash(e) => Self::Internal(e.to_string()),
            AuthError::Db(e) => Self::Db(e),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
