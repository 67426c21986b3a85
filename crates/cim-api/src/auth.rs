//! # Authentication — Token Gateway & Middleware
//!
//! Bearer-token authentication for municipal and state officials.
//!
//! ## Token Format
//!
//! HS256-signed JWTs carrying the official's identity and tier. Login
//! issues two tokens: a short-lived access token (24h) and a longer-lived
//! refresh token (7d). Tokens move `valid → expired` on the clock alone;
//! there is no server-side revocation list.
//!
//! ## Middleware
//!
//! Every protected route passes through [`auth_middleware`], which
//! extracts the `Authorization: Bearer` header, verifies signature and
//! expiry, and injects the decoded [`Claims`] into request extensions.
//! Handlers extract them via the `FromRequestParts` impl. The three
//! failure modes are distinguished for clients: missing header, expired
//! token (re-login prompt), and everything else as plain invalid.
//!
//! ## Passwords
//!
//! Credentials are verified against stored Argon2id PHC hashes —
//! [`verify_password`] is the slow comparison; plaintext is never stored.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorBody};

/// Access tokens expire after 24 hours.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
/// Refresh tokens expire after 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

// -- Claims -------------------------------------------------------------------

/// Which portal an official belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Municipal-level official, bound to one district.
    Municipality,
    /// State-level official, bound to one state.
    State,
}

/// Identity claims encoded in every token.
///
/// District fields are populated for municipal officials, state fields for
/// state officials; `iat`/`exp` are Unix timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub tier: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Identity input for token issuance — everything in [`Claims`] except the
/// timestamps, which the gateway stamps itself.
#[derive(Debug, Clone)]
pub struct OfficialIdentity {
    pub username: String,
    pub tier: Tier,
    pub district_id: Option<i64>,
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub state_name: Option<String>,
}

impl OfficialIdentity {
    /// Identity for a municipal official.
    pub fn municipal(username: impl Into<String>, district_id: i64, district_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            tier: Tier::Municipality,
            district_id: Some(district_id),
            district_name: Some(district_name.into()),
            state_id: None,
            state_name: None,
        }
    }

    /// Identity for a state official.
    pub fn state(username: impl Into<String>, state_id: i64, state_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            tier: Tier::State,
            district_id: None,
            district_name: None,
            state_id: Some(state_id),
            state_name: Some(state_name.into()),
        }
    }
}

/// The access/refresh pair returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// -- Keys ---------------------------------------------------------------------

/// Error constructing [`AuthKeys`].
#[derive(Debug, Error)]
pub enum AuthKeysError {
    /// The secret was absent or empty.
    #[error("JWT_SECRET is required")]
    MissingSecret,
    /// The secret is too short to be safe.
    #[error("JWT_SECRET must be at least 32 characters")]
    SecretTooShort,
}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Signature checks out but the expiry timestamp has passed.
    /// Callers should prompt re-login.
    Expired,
    /// Bad signature, malformed token, or any other failure.
    Invalid,
}

/// Token signing and verification keys, validated at construction.
#[derive(Clone)]
pub struct AuthKeys {
    secret: String,
}

impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeys")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl AuthKeys {
    /// Create keys from a secret, enforcing a minimum length.
    pub fn new(secret: &str) -> Result<Self, AuthKeysError> {
        if secret.is_empty() {
            return Err(AuthKeysError::MissingSecret);
        }
        if secret.len() < 32 {
            return Err(AuthKeysError::SecretTooShort);
        }
        Ok(Self {
            secret: secret.to_string(),
        })
    }

    /// Sign a token for an identity with the given time-to-live.
    ///
    /// A negative TTL produces an already-expired token; useful only in
    /// tests, harmless elsewhere.
    pub fn issue_token(&self, identity: &OfficialIdentity, ttl_secs: i64) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            username: identity.username.clone(),
            tier: identity.tier,
            district_id: identity.district_id,
            district_name: identity.district_name.clone(),
            state_id: identity.state_id,
            state_name: identity.state_name.clone(),
            iat: now,
            exp: now + ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Issue the access/refresh pair for a freshly authenticated official.
    pub fn issue_pair(&self, identity: &OfficialIdentity) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_token(identity, ACCESS_TOKEN_TTL_SECS)?,
            refresh_token: self.issue_token(identity, REFRESH_TOKEN_TTL_SECS)?,
        })
    }

    /// Verify signature and expiry, yielding the decoded claims.
    ///
    /// Expiry is reported as a distinct condition so callers can tell the
    /// client to re-login rather than treating the token as forged.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let validation = Validation::default();
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyError::Expired,
            _ => VerifyError::Invalid,
        })
    }
}

// -- Passwords ----------------------------------------------------------------

/// Hash a password with Argon2id, returning the PHC-formatted string that
/// embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash. The comparison is the
/// deliberately slow Argon2 verification.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// -- Middleware ---------------------------------------------------------------

/// Extract and validate the Bearer token from the Authorization header.
///
/// On success the decoded [`Claims`] are injected into request extensions
/// for downstream handlers. Failure responses distinguish a missing or
/// non-Bearer header, an expired token, and any other invalid token.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let keys = match request.extensions().get::<AuthKeys>().cloned() {
        Some(keys) => keys,
        None => {
            tracing::error!("auth middleware mounted without AuthKeys extension");
            return unauthorized_response("Invalid token.");
        }
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        _ => {
            tracing::warn!("authentication failed: missing or non-Bearer authorization header");
            return unauthorized_response("Access denied. No token provided.");
        }
    };

    match keys.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(VerifyError::Expired) => {
            tracing::warn!("authentication failed: token expired");
            unauthorized_response("Token expired. Please login again.")
        }
        Err(VerifyError::Invalid) => {
            tracing::warn!("authentication failed: invalid token");
            unauthorized_response("Invalid token.")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(message))).into_response()
}

/// Axum `FromRequestParts` implementation for [`Claims`].
///
/// Extracts the claims the auth middleware injected into extensions.
/// Returns 401 if none are present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided.".into()))
    }
}
