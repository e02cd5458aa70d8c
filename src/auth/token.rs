//! HS256 bearer tokens
//!
//! Tokens use the compact JWT layout `base64url(header).base64url(claims).base64url(mac)`
//! where `mac` is HMAC-SHA256 over the first two segments.

use super::{AuthError, Identity, InvalidTokenReason};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_ALGORITHM: &str = "HS256";
pub const TOKEN_TYPE: &str = "JWT";
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    mac: HmacSha256,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::EmptySecret)?;
        Ok(Self { mac, ttl })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues an access token for `user_id` valid for the configured ttl.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        self.issue_with_expiry(user_id, now, now + self.ttl)
    }

    pub fn issue_with_expiry(
        &self,
        user_id: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let header = TokenHeader {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes()));
        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let claims = self.decode(token).map_err(AuthError::InvalidToken)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::InvalidToken(InvalidTokenReason::Expired));
        }
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken(InvalidTokenReason::Malformed));
        }
        Ok(Identity::new(claims.sub))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, InvalidTokenReason> {
        let mut segments = token.split('.');
        let (Some(header), Some(claims), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(InvalidTokenReason::Malformed);
        };

        let header: TokenHeader = decode_segment(header)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(InvalidTokenReason::UnsupportedAlgorithm);
        }

        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| InvalidTokenReason::Malformed)?;
        let signing_input_len = token.len() - signature.len() - 1;
        let expected = self.sign(&token.as_bytes()[..signing_input_len]);
        if provided.len() != expected.len() || !bool::from(provided.ct_eq(expected.as_slice())) {
            return Err(InvalidTokenReason::BadSignature);
        }

        decode_segment(claims)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, InvalidTokenReason> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| InvalidTokenReason::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| InvalidTokenReason::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::seconds(DEFAULT_TOKEN_TTL_SECS)).unwrap()
    }

    fn reason(err: AuthError) -> InvalidTokenReason {
        match err {
            AuthError::InvalidToken(reason) => reason,
            other => panic!("expected invalid token, got {other:?}"),
        }
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let tokens = service();
        let token = tokens.issue("65a1f0c2b3d4e5f60718293a").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let identity = tokens.verify(&token).unwrap();
        assert_eq!(identity.user_id(), "65a1f0c2b3d4e5f60718293a");
    }

    #[test]
    fn garbage_is_malformed() {
        let err = service().verify("invalid Token").unwrap_err();
        assert_eq!(reason(err), InvalidTokenReason::Malformed);
        assert_eq!(
            service().verify("a.b.c.d").map(|_| ()).unwrap_err().to_string(),
            "Authentication error. Invalid token.Invalid JWT"
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new("other-secret", Duration::hours(1)).unwrap();
        let token = other.issue("user").unwrap();
        assert_eq!(
            reason(service().verify(&token).unwrap_err()),
            InvalidTokenReason::BadSignature
        );
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory","iat":0,"exp":99999999999}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert_eq!(
            reason(tokens.verify(&forged).unwrap_err()),
            InvalidTokenReason::BadSignature
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(2);
        let token = tokens
            .issue_with_expiry("alice", issued, issued + Duration::hours(1))
            .unwrap();
        assert_eq!(
            reason(tokens.verify(&token).unwrap_err()),
            InvalidTokenReason::Expired
        );
        assert!(tokens.verify_at(&token, issued).is_ok());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            TokenService::new("", Duration::hours(1)),
            Err(AuthError::EmptySecret)
        ));
    }
}
