//! Signed session cookies
//!
//! The cookie value is `base64url(json payload).base64url(hmac signature)`.
//! The payload carries the optional logged-in user id and the cart slot
//! (cart id + cached item count). There is no server-side session table;
//! the signature is what makes the cookie trustworthy.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use arbor_types::{CartContext, UserId};

use crate::crypto::{constant_time_eq, HmacKey};
use crate::AuthError;

/// Session cookie payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Logged-in user, if any
    pub user_id: Option<UserId>,
    /// Session-held cart slot
    pub cart: CartContext,
    /// Issue timestamp (milliseconds)
    pub issued: i64,
    /// Expiration timestamp (milliseconds)
    pub expires: i64,
}

impl SessionPayload {
    /// Create a payload valid for `duration_hours` from now
    pub fn new(user_id: Option<UserId>, cart: CartContext, duration_hours: u32) -> Self {
        let now = Utc::now().timestamp_millis();
        let expires = now + i64::from(duration_hours) * 60 * 60 * 1000;

        Self {
            user_id,
            cart,
            issued: now,
            expires,
        }
    }

    /// Check if the session is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires
    }
}

/// Signs and validates session cookie values
#[derive(Clone)]
pub struct SessionCodec {
    hmac_key: HmacKey,
    session_duration_hours: u32,
}

impl SessionCodec {
    /// Create a new codec.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 bytes.
    pub fn new(secret: impl AsRef<[u8]>, session_duration_hours: u32) -> Self {
        let hmac_key = HmacKey::new(secret).expect("session secret must be at least 32 bytes");
        Self {
            hmac_key,
            session_duration_hours,
        }
    }

    /// Build and sign a fresh cookie value for the given session state
    pub fn issue(&self, user_id: Option<UserId>, cart: CartContext) -> String {
        let payload = SessionPayload::new(user_id, cart, self.session_duration_hours);
        self.encode(&payload)
    }

    /// Sign an existing payload into a cookie value
    pub fn encode(&self, payload: &SessionPayload) -> String {
        let json = serde_json::to_vec(payload).expect("session payload serializes");
        let payload_b64 = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.hmac_key.sign(payload_b64.as_bytes()));
        format!("{payload_b64}.{signature}")
    }

    /// Validate a signed cookie value
    pub fn decode(&self, cookie: &str) -> Result<SessionPayload, AuthError> {
        let (payload_b64, signature_b64) = cookie
            .rsplit_once('.')
            .ok_or(AuthError::InvalidToken)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        if !self.hmac_key.verify(payload_b64.as_bytes(), &signature) {
            tracing::debug!("session signature mismatch");
            return Err(AuthError::InvalidToken);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload: SessionPayload =
            serde_json::from_slice(&payload_json).map_err(|_| AuthError::InvalidToken)?;

        if payload.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(payload)
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("session_duration_hours", &self.session_duration_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::CartId;

    fn codec() -> SessionCodec {
        SessionCodec::new([9u8; 32], 24)
    }

    #[test]
    fn test_roundtrip() {
        let codec = codec();
        let cart = CartContext::with_cart(CartId::new(), 3);
        let user = Some(UserId::new());

        let cookie = codec.issue(user, cart);
        let decoded = codec.decode(&cookie).unwrap();

        assert_eq!(decoded.user_id, user);
        assert_eq!(decoded.cart, cart);
    }

    #[test]
    fn test_anonymous_roundtrip() {
        let codec = codec();
        let cookie = codec.issue(None, CartContext::empty());
        let decoded = codec.decode(&cookie).unwrap();

        assert_eq!(decoded.user_id, None);
        assert_eq!(decoded.cart, CartContext::empty());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let cookie = codec.issue(None, CartContext::empty());
        let (payload, signature) = cookie.rsplit_once('.').unwrap();

        let mut forged = payload.to_string();
        forged.push('x');
        let forged = format!("{forged}.{signature}");

        assert!(matches!(
            codec.decode(&forged),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let cookie = codec().issue(None, CartContext::empty());
        let other = SessionCodec::new([1u8; 32], 24);
        assert!(matches!(other.decode(&cookie), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_rejected() {
        let codec = codec();
        let mut payload = SessionPayload::new(None, CartContext::empty(), 24);
        payload.expires = payload.issued - 1;
        let cookie = codec.encode(&payload);

        assert!(matches!(codec.decode(&cookie), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_malformed_rejected() {
        let codec = codec();
        assert!(codec.decode("no-dot-here").is_err());
        assert!(codec.decode("").is_err());
        assert!(codec.decode("a.b.c").is_err());
    }
}
