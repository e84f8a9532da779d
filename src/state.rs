use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::repo::{SqlxUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::db;
use crate::patients::repo::{PatientRepo, SqlxPatientRepo};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub patients: Arc<dyn PatientRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(pool, config))
    }

    pub fn from_parts(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(SqlxUserRepo::new(pool.clone())),
            patients: Arc::new(SqlxPatientRepo::new(pool)),
            config,
        }
    }

    /// State backed by a fresh in-memory database.
    #[cfg(test)]
    pub async fn fake() -> Self {
        let pool = db::connect_in_memory().await.expect("in-memory pool");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            session: crate::config::SessionConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                ttl_minutes: 5,
                cookie_name: "session".into(),
                cookie_secure: false,
            },
        });

        Self::from_parts(pool, config)
    }
}
