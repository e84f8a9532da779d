//! Signed session tokens.
//!
//! A session is an HS256 JWT naming the user id; it travels in an HttpOnly
//! cookie and is re-checked against the user table on every request.

use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::{SessionConfig, MAX_SESSION_TTL_MINUTES};
use crate::state::AppState;

/// Session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,    // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
}

/// Signing material plus cookie settings, derived from `SessionConfig`.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
    pub cookie_name: String,
    cookie_secure: bool,
}

impl From<&SessionConfig> for SessionKeys {
    fn from(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            ttl: Duration::from_secs(cfg.ttl_minutes.clamp(0, MAX_SESSION_TTL_MINUTES) as u64 * 60),
            cookie_name: cfg.cookie_name.clone(),
            cookie_secure: cfg.cookie_secure,
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.session)
    }
}

impl SessionKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Cookie carrying a freshly signed session for `user_id`.
    pub fn cookie(&self, user_id: i64) -> anyhow::Result<Cookie<'static>> {
        let token = self.sign(user_id)?;
        Ok(Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .build())
    }

    /// Cookie that, once removed from the jar, clears the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), "")).path("/").build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, ttl_minutes: i64) -> SessionConfig {
        SessionConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            ttl_minutes,
            cookie_name: "session".into(),
            cookie_secure: false,
        }
    }

    #[test]
    fn sign_and_verify() {
        let keys = SessionKeys::from(&config("secret", 5));
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "test-issuer");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let token = SessionKeys::from(&config("secret", 5)).sign(1).unwrap();
        let other = SessionKeys::from(&config("another-secret", 5));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // Expired well past the default 60s leeway.
        let keys = SessionKeys::from(&config("secret", -10));
        let claims = Claims {
            sub: 1,
            iat: 0,
            exp: (OffsetDateTime::now_utc().unix_timestamp() - 600) as usize,
            iss: "test-issuer".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let keys = SessionKeys::from(&config("secret", i64::MAX / 2));
        let token = keys.sign(3).expect("sign");
        assert_eq!(keys.verify(&token).unwrap().sub, 3);
        assert_eq!(keys.ttl.as_secs(), MAX_SESSION_TTL_MINUTES as u64 * 60);
    }

    #[test]
    fn cookie_is_http_only() {
        let keys = SessionKeys::from(&config("secret", 5));
        let cookie = keys.cookie(7).unwrap();
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(keys.verify(cookie.value()).unwrap().sub, 7);
    }
}
