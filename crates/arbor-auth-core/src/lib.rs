//! Arbor Auth Core - Authentication primitives
//!
//! Password registration/login backed by bcrypt, and the signed session
//! cookie that carries the shopper's identity and cart slot between
//! requests. The cookie is the only state held outside the database.

pub mod crypto;
pub mod error;
pub mod service;
pub mod session;

pub use crypto::{constant_time_eq, HmacKey, HmacKeyError};
pub use error::AuthError;
pub use service::{AuthService, NewUser};
pub use session::{SessionCodec, SessionPayload};
