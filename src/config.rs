use std::net::SocketAddr;

use anyhow::{bail, Context};
use serde::Deserialize;

/// Placeholder secret that older deployments shipped as a fallback.
const PLACEHOLDER_SECRET: &str = "your-secret-key-please-change-in-production";

/// Longest accepted session lifetime: one year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub secure: bool,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = lookup("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }
        if secret == PLACEHOLDER_SECRET {
            bail!("JWT_SECRET is set to the well-known placeholder; configure a real secret");
        }

        let jwt = JwtConfig {
            secret,
            ttl_minutes: parse_or(&lookup, "JWT_TTL_MINUTES", 60 * 24)?,
        };
        if !(1..=MAX_TTL_MINUTES).contains(&jwt.ttl_minutes) {
            bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}");
        }

        let production = lookup("APP_ENV").is_some_and(|v| v == "production");
        let cookie = CookieConfig {
            name: lookup("COOKIE_NAME").unwrap_or_else(|| "token".into()),
            path: lookup("COOKIE_PATH").unwrap_or_else(|| "/api".into()),
            secure: parse_or(&lookup, "COOKIE_SECURE", production)?,
        };

        let password = PasswordConfig {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", 19 * 1024)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", 2)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", 1)?,
        };

        let bind_addr = format!(
            "{}:{}",
            lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            lookup("APP_PORT").unwrap_or_else(|| "8080".into())
        )
        .parse()
        .context("APP_HOST/APP_PORT do not form a socket address")?;

        Ok(Self {
            database_url,
            bind_addr,
            jwt,
            cookie,
            password,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}
