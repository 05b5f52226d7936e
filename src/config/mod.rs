pub mod database;

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::models::inquiry::PREFERRED_TIME_FORMAT;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 10;
pub const DEFAULT_CONNECT_DELAY_SECS: u64 = 2;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_PREFERRED_TIME_MIN: &str = "2025-12-10T00:00";

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    /// Connection string with the password replaced, safe for logs.
    pub fn url_masked(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return "****".to_string();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match credentials.split_once(':') {
            Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
            None => self.url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub api_key: String,
    pub server_host: String,
    pub server_port: u16,
    /// Earliest accepted `preferred_time`; `None` disables the check.
    pub preferred_time_min: Option<DateTime<Utc>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = var("PG_DSN")
            .or_else(|| var("DATABASE_URL"))
            .ok_or_else(|| anyhow!("PG_DSN (or DATABASE_URL) must be set"))?;
        let api_key = var("API_KEY").ok_or_else(|| anyhow!("API_KEY must be set"))?;

        let database = DatabaseSettings {
            url,
            max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            connect_attempts: parse_or(&var, "DB_CONNECT_ATTEMPTS", DEFAULT_CONNECT_ATTEMPTS)?,
            connect_delay: Duration::from_secs(parse_or(
                &var,
                "DB_CONNECT_DELAY_SECS",
                DEFAULT_CONNECT_DELAY_SECS,
            )?),
            acquire_timeout: Duration::from_secs(5),
        };

        let preferred_time_min = match var("PREFERRED_TIME_MIN") {
            Some(v) if v.trim().eq_ignore_ascii_case("off") => None,
            Some(v) => Some(parse_utc_minute(v.trim()).context("PREFERRED_TIME_MIN is invalid")?),
            None => Some(parse_utc_minute(DEFAULT_PREFERRED_TIME_MIN)?),
        };

        Ok(Self {
            database,
            api_key,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            preferred_time_min,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Parses `YYYY-MM-DDTHH:MM` as a UTC instant. Every field must be
/// zero-padded; chrono alone would accept `2025-12-9T9:5`.
pub fn parse_utc_minute(raw: &str) -> Result<DateTime<Utc>> {
    if !is_padded_minute(raw) {
        return Err(anyhow!("expected YYYY-MM-DDTHH:MM, got {:?}", raw));
    }
    let naive = NaiveDateTime::parse_from_str(raw, PREFERRED_TIME_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn is_padded_minute(raw: &str) -> bool {
    const SHAPE: &[u8; 16] = b"dddd-dd-ddTdd:dd";

    raw.len() == SHAPE.len()
        && raw.bytes().zip(SHAPE.iter()).all(|(b, &expected)| match expected {
            b'd' => b.is_ascii_digit(),
            other => b == other,
        })
}
