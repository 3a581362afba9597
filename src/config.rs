//! Runtime configuration loaded from the environment (and `.env`).

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context};

/// Longest session lifetime accepted from `SESSION_TTL_HOURS` (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// ISO code used when formatting money for display.
    pub currency: String,
    pub session_ttl_hours: i64,
    pub catalog_cache_ttl: Duration,
    /// Browser origin allowed to call the API, if the UI is served elsewhere.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let session_ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", "24")?;
        ensure!(
            (1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours),
            "SESSION_TTL_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_TTL_HOURS,
            session_ttl_hours
        );

        Ok(Self {
            database_url,
            bind_addr: parse_or(&lookup, "BIND_ADDR", "0.0.0.0:3000")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", "10")?,
            currency: lookup("CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "BRL".to_string()),
            session_ttl_hours,
            catalog_cache_ttl: Duration::from_secs(parse_or(&lookup, "CATALOG_CACHE_TTL_SECS", "300")?),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_connections: 10,
            currency: "BRL".to_string(),
            session_ttl_hours: 24,
            catalog_cache_ttl: Duration::from_secs(300),
            cors_allowed_origin: None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("invalid value for {}={:?}: {}", key, raw, e))
}
