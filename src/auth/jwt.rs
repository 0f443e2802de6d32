//! Bearer token issuance and validation
//!
//! Tokens are compact HS256-signed JWTs carrying the authenticated username
//! as subject plus issued-at and expiry timestamps. Validity is derived
//! purely from signature and expiry at verification time; there is no
//! server-side token record and no revocation mechanism: once issued, a
//! token is good for its full TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Token type claim value and response `type` field
pub const BEARER_TYPE: &str = "Bearer";

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated username
    pub sub: String,

    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch
    pub exp: i64,

    /// Token type, always "Bearer"
    #[serde(rename = "type")]
    pub token_type: String,
}

/// A freshly signed token plus its issuance metadata
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact signed representation
    pub token: String,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// Lifetime in milliseconds
    pub expires_in_ms: i64,
}

/// Token issuance and validation service
///
/// Holds the process-wide signing secret, loaded once at startup and never
/// rotated at runtime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_ms: i64,
}

impl TokenService {
    /// Create a token service from the signing secret and TTL in milliseconds
    pub fn new(secret: &str, ttl_ms: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_ms,
        }
    }

    /// Issue a signed token for the given username
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + Duration::milliseconds(self.ttl_ms);

        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: BEARER_TYPE.to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Issue(e.to_string()))?;

        tracing::debug!(username = %username, ttl_ms = self.ttl_ms, "Issued bearer token");

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_in_ms: self.ttl_ms,
        })
    }

    /// Verify signature, structure, and expiry, returning the claims
    ///
    /// This is the only way to obtain a subject from a token; there is no
    /// path to read claims without full validation.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation())?;
        Ok(data.claims)
    }

    /// True iff the token passes full validation
    pub fn validate(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Validated subject claim of the token
    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.decode(token)?.sub)
    }

    /// True when the token has expired or cannot be parsed at all
    ///
    /// Fail-safe: an unreadable token is reported as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        self.decode(token).is_err()
    }

    fn validation() -> Validation {
        let mut validation = Validation::default();
        // Exact expiry semantics; the default 60s leeway would keep freshly
        // expired tokens valid.
        validation.leeway = 0;
        validation
    }
}
