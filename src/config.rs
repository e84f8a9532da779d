use anyhow::Context;
use serde::Deserialize;

const DEFAULT_SESSION_TTL_MINUTES: i64 = 8 * 60;
/// One year; keeps `exp` arithmetic far from overflow.
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let session = SessionConfig {
            secret: std::env::var("SECRET_KEY").context("SECRET_KEY is not set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "patient-records".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok())?,
            cookie_name: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "session".into()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        Ok(Self {
            database_url,
            session,
        })
    }
}

fn parse_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("SESSION_TTL_MINUTES is not an integer: {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes),
        "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {minutes}"
    );
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_when_unset() {
        assert_eq!(parse_ttl_minutes(None).unwrap(), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some(" 30 ".into())).unwrap(), 30);
    }

    #[test]
    fn ttl_out_of_range_fails_at_startup() {
        let huge = (i64::MAX / 2).to_string();
        for raw in ["0", "-5", "abc", huge.as_str()] {
            assert!(parse_ttl_minutes(Some(raw.to_string())).is_err(), "{raw}");
        }
    }
}
