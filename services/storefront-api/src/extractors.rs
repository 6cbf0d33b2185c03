//! Axum extractors for the session cookie and the authenticated user
//!
//! The session cookie is decoded on every request into a [`Session`]; a
//! missing or invalid cookie simply yields a fresh anonymous session.
//! Handlers that mutate the cart slot re-issue the cookie via
//! [`session_headers`].

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderName};

use arbor_auth_core::SessionPayload;
use arbor_types::{CartContext, UserId};
use arbor_order_core::Actor;

use crate::error::ApiError;
use crate::state::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "arbor_session";

/// Decoded session for this request
#[derive(Debug, Clone)]
pub struct Session {
    /// Logged-in user carried by the cookie, if any
    pub user_id: Option<UserId>,
    /// Session-held cart slot
    pub cart: CartContext,
}

impl Session {
    fn anonymous() -> Self {
        Self {
            user_id: None,
            cart: CartContext::empty(),
        }
    }

    fn from_payload(payload: SessionPayload) -> Self {
        Self {
            user_id: payload.user_id,
            cart: payload.cart,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let Some(cookie) = extract_session_cookie(parts) else {
            return Ok(Session::anonymous());
        };

        match app_state.sessions.decode(&cookie) {
            Ok(payload) => Ok(Session::from_payload(payload)),
            Err(e) => {
                tracing::debug!(error = ?e, "session cookie rejected, starting fresh");
                Ok(Session::anonymous())
            }
        }
    }
}

/// Authenticated user loaded from the database.
///
/// The staff flag always comes from the user row, never from the cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl AuthUser {
    /// Identity for order-engine authorization checks
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            is_staff: self.is_staff,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };

        let user_id = session
            .user_id
            .ok_or_else(|| ApiError::Unauthorized("Authentication required.".to_string()))?;

        let app_state = AppState::from_ref(state);
        let user = app_state
            .accounts
            .get_user(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("Authentication required.".to_string()))?;

        Ok(AuthUser {
            user_id: UserId(user.id),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
        })
    }
}

/// Optional auth extractor - yields None instead of rejecting
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}

impl OptionalAuthUser {
    /// The caller's user id, if logged in
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

/// Build the Set-Cookie header refreshing the session slot
pub fn session_headers(
    state: &AppState,
    user_id: Option<UserId>,
    cart: CartContext,
) -> [(HeaderName, String); 1] {
    let value = state.sessions.issue(user_id, cart);
    let max_age = u64::from(state.config.session_duration_hours) * 3600;
    [(
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}"),
    )]
}

/// Build the Set-Cookie header that discards the session entirely
pub fn clear_session_headers() -> [(HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"),
    )]
}

/// Extract the session cookie value from the Cookie header
fn extract_session_cookie(parts: &Parts) -> Option<String> {
    let cookie_header = parts.headers.get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;
    let prefix = format!("{SESSION_COOKIE}=");

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}
