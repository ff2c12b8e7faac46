//! Access token issuance and verification
//!
//! Tokens are compact HMAC-signed JWTs carrying exactly
//! `{authorized, userId, exp}`. They are stateless: validity is derived
//! from the signature and the expiry alone, and nothing is stored
//! server-side.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Authenticated user identifier carried by a token
pub type UserId = u64;

/// Largest integer an IEEE-754 double holds exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Header algorithms accepted on verification. Issuance always uses HS256.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claim set written into every issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub authorized: bool,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a token was refused.
///
/// The variants exist for logging and tests; the HTTP layer reports all of
/// them except `SigningFailure` as one indistinguishable 401.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token signing algorithm is not accepted")]
    UnsupportedAlgorithm,

    #[error("userId claim is missing or not an exact unsigned integer")]
    ClaimDecode,

    #[error("failed to sign token: {0}")]
    SigningFailure(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::UnsupportedAlgorithm,
            _ => TokenError::Malformed,
        }
    }
}

/// Pre-computed HMAC keys, shared behind `Arc` so the service clones cheaply
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    unset: bool,
}

impl TokenKeys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
            unset: secret.is_empty(),
        }
    }
}

/// Issues and verifies access tokens with a single process-wide secret.
///
/// Construct once at startup and keep it in `AppState`; the secret is
/// read-only for the lifetime of the process.
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    ttl: Duration,
    validation: Arc<Validation>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: TokenKeys::new(secret),
            ttl: Duration::seconds(ttl_secs),
            validation: Arc::new(validation),
        }
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a non-empty signing secret was supplied
    pub fn is_configured(&self) -> bool {
        !self.keys.unset
    }

    /// Issue a token for `user_id`, expiring one TTL from now
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        if self.keys.unset {
            return Err(TokenError::SigningFailure(
                "signing secret is not configured".to_string(),
            ));
        }

        let claims = Claims {
            authorized: true,
            user_id,
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }

    /// Check signature, algorithm family and expiry
    pub fn verify(&self, token: &str) -> Result<(), TokenError> {
        self.decode_claims(token).map(|_| ())
    }

    /// Verify `token`, then decode its `userId` claim
    pub fn extract_principal(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = self.decode_claims(token)?;
        user_id_from_claim(claims.get("userId"))
    }

    /// Claims are decoded as a loose map so that tokens from issuers that
    /// encode numbers as floats can still be read, and checked afterwards.
    fn decode_claims(&self, token: &str) -> Result<Map<String, Value>, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }
        // Nothing can be trusted without a secret, not even an empty-key MAC.
        if self.keys.unset {
            return Err(TokenError::BadSignature);
        }
        ensure_hmac_header(token)?;

        let claims = decode::<Map<String, Value>>(token, &self.keys.decoding, &self.validation)?.claims;

        match claims.get("exp").and_then(Value::as_f64) {
            Some(exp) if exp > Utc::now().timestamp() as f64 => {}
            Some(_) => return Err(TokenError::Expired),
            None => return Err(TokenError::Malformed),
        }

        if claims.get("authorized") != Some(&Value::Bool(true)) {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: split on single spaces, two
/// segments, `Bearer` scheme. Any other shape yields `""`, which
/// verification rejects as malformed.
pub fn bearer_token(header_value: &str) -> &str {
    let mut segments = header_value.split(' ');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => token,
        _ => "",
    }
}

/// Reject anything outside the HMAC family before the JWT library sees it,
/// including `none`, which the library cannot even parse as a header.
fn ensure_hmac_header(token: &str) -> Result<(), TokenError> {
    let encoded = token.split('.').next().unwrap_or_default();
    let raw = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| TokenError::Malformed)?;
    let header: Value = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    match header.get("alg").and_then(Value::as_str) {
        Some("HS256" | "HS384" | "HS512") => Ok(()),
        _ => Err(TokenError::UnsupportedAlgorithm),
    }
}

/// Convert the `userId` claim into an exact `u64`.
///
/// Integers decode as-is. Floats are accepted only when they are integral,
/// non-negative and inside the safe-integer range; anything larger may
/// already have been rounded by the issuer.
fn user_id_from_claim(claim: Option<&Value>) -> Result<UserId, TokenError> {
    let Some(Value::Number(number)) = claim else {
        return Err(TokenError::ClaimDecode);
    };

    if let Some(id) = number.as_u64() {
        return Ok(id);
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= MAX_SAFE_INTEGER as f64 => Ok(f as u64),
        _ => Err(TokenError::ClaimDecode),
    }
}
