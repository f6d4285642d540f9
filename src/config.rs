use std::{env, str::FromStr};

use anyhow::{anyhow, bail};

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub max_concurrent_requests: usize,
    pub body_limit_bytes: usize,
    /// Lifetime of the tokens printed by the seed tool.
    pub token_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL is not set"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET is not set"))?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            database_url,
            jwt_secret,
            host: env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_or("APP_PORT", 3000)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            max_concurrent_requests: parsed_or("MAX_CONCURRENT_REQUESTS", 100)?,
            body_limit_bytes: parsed_or("BODY_LIMIT_BYTES", 1024 * 1024)?,
            token_ttl_hours: parsed_or("TOKEN_TTL_HOURS", 24 * 30)?,
        })
    }
}

/// An unset variable falls back to `default`; a set one must parse.
fn parsed_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
