//! Authentication handlers (signup, login, logout, me, profile)
//!
//! Login and signup resolve the cart immediately so an anonymous session
//! cart is merged or adopted right away, and the refreshed session cookie
//! goes out with the response.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use arbor_auth_core::NewUser;
use arbor_db::{UpdateProfile, UserRow};

use crate::error::ApiResult;
use crate::extractors::{clear_session_headers, session_headers, AuthUser, Session};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl From<&UserRow> for UserInfo {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_staff: user.is_staff,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
    pub cart_item_count: i64,
    /// An anonymous cart was merged into the account cart during login
    pub cart_merged: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
    pub cart_item_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .accounts
        .register(NewUser {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    let user_id = arbor_types::UserId(user.id);

    // Adopts the session's anonymous cart, if one exists.
    let resolved = state
        .carts
        .resolve_or_create(session.cart, Some(user_id))
        .await?;

    let headers = session_headers(&state, Some(user_id), resolved.context);

    Ok((
        headers,
        Json(AuthResponse {
            success: true,
            message: "Account created successfully!".to_string(),
            user: UserInfo::from(&user),
            cart_item_count: resolved.item_count,
            cart_merged: resolved.merged,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.accounts.login(&req.email, &req.password).await?;
    let user_id = arbor_types::UserId(user.id);

    // Merge-on-login happens here: the session's anonymous cart folds into
    // the account cart before the new cookie is issued.
    let resolved = state
        .carts
        .resolve_or_create(session.cart, Some(user_id))
        .await?;

    let display_name = if user.first_name.is_empty() {
        user.email.clone()
    } else {
        user.first_name.clone()
    };

    let headers = session_headers(&state, Some(user_id), resolved.context);

    Ok((
        headers,
        Json(AuthResponse {
            success: true,
            message: format!("Welcome back, {display_name}!"),
            user: UserInfo::from(&user),
            cart_item_count: resolved.item_count,
            cart_merged: resolved.merged,
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Discards the whole session, cart slot included.
pub async fn logout(_user: AuthUser) -> impl IntoResponse {
    (
        clear_session_headers(),
        Json(LogoutResponse {
            success: true,
            message: "You have been logged out.".to_string(),
        }),
    )
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser, session: Session) -> Json<MeResponse> {
    Json(MeResponse {
        cart_item_count: session.cart.item_count,
        user: UserInfo {
            id: user.user_id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
        },
    })
}

/// PATCH /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let updated = state
        .accounts
        .update_profile(
            user.user_id,
            UpdateProfile {
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile updated successfully!".to_string(),
        user: UserInfo::from(&updated),
    }))
}
