//! Admin session tokens.
//!
//! A session is a single opaque marker: either the caller holds a valid,
//! unexpired token signed with the server secret, or it is a public caller.
//! There are no roles. Tokens are HS256 JWTs whose lifetime is checked
//! against a caller-supplied `now` and TTL, so the gate is a pure function.

use chrono::Duration;
use florist_core::types::Timestamp;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Subject claim of every admin token.
const ADMIN_SUBJECT: &str = "admin";

/// Default session lifetime: one week.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier.
    pub jti: String,
}

/// Session signing secret and lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var            | Required | Default  |
    /// |--------------------|----------|----------|
    /// | `SESSION_SECRET`   | **yes**  | --       |
    /// | `SESSION_TTL_SECS` | no       | `604800` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let ttl_secs: i64 = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse()
            .expect("SESSION_TTL_SECS must be a valid i64");

        Self { secret, ttl_secs }
    }

    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs)
    }
}

/// Issue a session token valid from `now` for the configured TTL.
pub fn issue_token(
    now: Timestamp,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = now.timestamp();
    let claims = Claims {
        sub: ADMIN_SUBJECT.to_string(),
        exp: iat + config.ttl_secs,
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// The Access Gate.
///
/// `true` only for a token that carries our signature and subject, was
/// issued no later than `now`, and is younger than both its own `exp` and
/// the configured TTL. Absent, malformed, forged, or stale tokens are all
/// simply `false`.
pub fn is_authorized(token: Option<&str>, now: Timestamp, config: &SessionConfig) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return false;
    };

    let mut validation = Validation::default();
    // Expiry is checked against the supplied clock below.
    validation.validate_exp = false;
    let Ok(data) = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    ) else {
        return false;
    };

    let claims = data.claims;
    let now = now.timestamp();
    claims.sub == ADMIN_SUBJECT
        && claims.iat <= now
        && now < claims.exp
        && now < claims.iat + config.ttl_secs
}

/// `Set-Cookie` value installing the session.
pub fn session_cookie(token: &str, config: &SessionConfig, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        config.ttl_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
