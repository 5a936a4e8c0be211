use std::env;
use std::time::Duration;

use crate::infrastructure::db::PoolSettings;

const DEV_JWT_SECRET: &str = "development-secret-change-me";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_busy_timeout_secs: u64,
    pub jwt_secret: String,
    pub jwt_expires_secs: i64,
    pub is_production: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let frontend_url = env::var("FRONTEND_URL").ok();
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://profiles.db".into());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        let db_busy_timeout_secs = env::var("DB_BUSY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.into());
        let jwt_expires_secs = env::var("JWT_EXPIRES_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60 * 60);
        let is_production = matches!(
            env::var("RUST_ENV").ok().as_deref(),
            Some("production") | Some("prod")
        );

        let cfg = Self {
            api_port,
            frontend_url,
            database_url,
            db_max_connections,
            db_busy_timeout_secs,
            jwt_secret,
            jwt_expires_secs,
            is_production,
        };
        cfg.check_production()?;
        Ok(cfg)
    }

    /// Production hardening: require a real frontend origin and a strong secret.
    fn check_production(&self) -> anyhow::Result<()> {
        if !self.is_production {
            return Ok(());
        }
        if !self
            .frontend_url
            .as_deref()
            .is_some_and(|u| u.starts_with("http"))
        {
            anyhow::bail!(
                "FRONTEND_URL must be set to a full origin in production (e.g., https://app.example.com)"
            );
        }
        if self.jwt_secret == DEV_JWT_SECRET || self.jwt_secret.len() < 16 {
            anyhow::bail!("JWT_SECRET must be set to a strong secret in production");
        }
        Ok(())
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            busy_timeout: Duration::from_secs(self.db_busy_timeout_secs),
        }
    }

    /// Cookies are marked `Secure` when the frontend is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url
            .as_deref()
            .is_some_and(|u| u.starts_with("https://"))
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api_port: 0,
        frontend_url: None,
        database_url: "sqlite::memory:".into(),
        db_max_connections: 1,
        db_busy_timeout_secs: 1,
        jwt_secret: "test-secret-0123456789".into(),
        jwt_expires_secs: 60,
        is_production: false,
    }
}
