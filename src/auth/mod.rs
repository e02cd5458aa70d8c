//! Bearer-token authentication.
//!
//! Resolves the `Authorization: Bearer <token>` header to an [`Identity`].

pub mod token;

pub use token::{DEFAULT_TOKEN_TTL_SECS, TokenClaims, TokenService};

use http::HeaderMap;
use http::header::AUTHORIZATION;
use thiserror::Error;

pub const TOKEN_REQUIRED_MESSAGE: &str = "Authentication error. Token required.";
// Two sentences without a separator; existing clients match on this text.
pub const INVALID_TOKEN_MESSAGE: &str = "Authentication error. Invalid token.Invalid JWT";

const BEARER_SCHEME: &str = "bearer";

/// Why a presented token was refused. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTokenReason {
    Malformed,
    UnsupportedAlgorithm,
    BadSignature,
    Expired,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication error. Token required.")]
    MissingToken,

    #[error("Authentication error. Invalid token.Invalid JWT")]
    InvalidToken(InvalidTokenReason),

    #[error("token secret must not be empty")]
    EmptySecret,

    #[error("token encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Extracts the raw token from an `Authorization: Bearer` header.
///
/// A missing header, a non-bearer scheme or an empty token all count as
/// "no token presented".
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}
