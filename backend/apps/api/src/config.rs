//! Server Configuration
//!
//! Read once from the environment at startup.

use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use livestock::LivestockConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
    pub livestock: LivestockConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Release builds require
    /// `JWT_SECRET`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(&lookup, !cfg!(debug_assertions))
    }

    fn build<F>(lookup: &F, release: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;
        let max_connections =
            parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let mut auth = match var("JWT_SECRET") {
            Some(secret) => AuthConfig::new(secret.into_bytes()),
            None if release => bail!("JWT_SECRET must be set in production"),
            None => {
                tracing::warn!("JWT_SECRET not set, using a random development secret");
                AuthConfig::development()
            }
        };
        if !auth.has_strong_secret() {
            bail!(
                "JWT_SECRET must be at least {} bytes",
                auth::application::config::MIN_JWT_SECRET_LEN
            );
        }
        if let Some(ttl) = var("JWT_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().context("JWT_TTL_SECS must be a number")?;
            auth = auth.with_ttl(Duration::from_secs(secs));
        }
        if let Some(issuer) = var("JWT_ISSUER") {
            auth = auth.with_issuer(issuer);
        }
        if let Some(pepper) = var("PASSWORD_PEPPER") {
            auth = auth.with_pepper(pepper.into_bytes());
        }

        let livestock = if release {
            LivestockConfig::default()
        } else {
            LivestockConfig::development()
        };

        let mut allowed_origins = split_origins(
            &var("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );
        allowed_origins.extend(["BACKEND_ADDR", "AI_ADDR"].into_iter().filter_map(var));

        Ok(Self {
            database_url,
            port,
            max_connections,
            allowed_origins,
            auth,
            livestock,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_in_development() {
        let config = ServerConfig::build(&lookup(&[("DATABASE_URL", "postgres://db")]), false)
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert!(config.auth.has_strong_secret());
        assert_eq!(config.auth.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.livestock.sas_token_ttl, Duration::from_secs(3600));
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_release_requires_jwt_secret() {
        let env = lookup(&[("DATABASE_URL", "postgres://db")]);
        assert!(ServerConfig::build(&env, true).is_err());

        let secret = "k".repeat(32);
        let env = lookup(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", &secret)]);
        let config = ServerConfig::build(&env, true).unwrap();
        assert_eq!(config.livestock.sas_token_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_overrides() {
        let secret = "k".repeat(40);
        let env = lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "8080"),
            ("JWT_SECRET", &secret),
            ("JWT_TTL_SECS", "120"),
            ("JWT_ISSUER", "farm-api"),
            ("FRONTEND_ORIGINS", "https://app.example.com, ,https://admin.example.com"),
            ("AI_ADDR", "http://ai.internal:8000"),
        ]);
        let config = ServerConfig::build(&env, true).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(120));
        assert_eq!(config.auth.issuer.as_deref(), Some("farm-api"));
        assert_eq!(
            config.allowed_origins,
            vec![
                "https://app.example.com",
                "https://admin.example.com",
                "http://ai.internal:8000"
            ]
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ServerConfig::build(&lookup(&[]), false).is_err());
        assert!(
            ServerConfig::build(
                &lookup(&[("DATABASE_URL", "postgres://db"), ("PORT", "http")]),
                false
            )
            .is_err()
        );
        assert!(
            ServerConfig::build(
                &lookup(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "short")]),
                true
            )
            .is_err()
        );
    }
}
