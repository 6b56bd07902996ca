use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// One year.
pub const MAX_TOKEN_TTL_HOURS: u32 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("ACCOUNTS_JWT_SECRET").unwrap_or_else(|| {
            warn!("ACCOUNTS_JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.into()
        });

        Ok(Self {
            jwt_secret,
            db_path: lookup("ACCOUNTS_DB_PATH")
                .unwrap_or_else(|| "accounts.db".into())
                .into(),
            host: parse_var(&lookup, "ACCOUNTS_HOST", "0.0.0.0")?,
            port: parse_var(&lookup, "ACCOUNTS_PORT", "3000")?,
            token_ttl: token_ttl(&lookup)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

/// Whole hours in `1..=MAX_TOKEN_TTL_HOURS`.
fn token_ttl(lookup: &impl Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
    const VAR: &str = "ACCOUNTS_TOKEN_TTL_HOURS";
    let hours: u32 = parse_var(lookup, VAR, "24")?;

    if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        if let Some(ttl) = Duration::try_hours(hours.into()) {
            return Ok(ttl);
        }
    }

    Err(ConfigError::Invalid {
        var: VAR,
        value: hours.to_string(),
    })
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(ConfigError::Invalid { var, value }),
    }
}
