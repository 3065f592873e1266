use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
}

/// Connection settings for the database gateway.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub connection_limit: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Discrete MySQL parameters, as read from `DB_HOST` and friends.
    MySql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
    /// A full sqlx URL taken verbatim from `DATABASE_URL`.
    Url(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let host = env_map
            .get("HOST")
            .map(|s| s.as_str())
            .unwrap_or("0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue("HOST".to_string(), "must be an IP address".to_string())
            })?;

        let port = parse_number::<u16>(&env_map, "PORT", "4444")?;

        let target = match env_map.get("DATABASE_URL") {
            Some(url) => {
                if !(url.starts_with("mysql:") || url.starts_with("sqlite:")) {
                    return Err(ConfigError::InvalidValue(
                        "DATABASE_URL".to_string(),
                        format!("unsupported scheme in {}", url),
                    ));
                }
                DatabaseTarget::Url(url.clone())
            }
            None => DatabaseTarget::MySql {
                host: required(&env_map, "DB_HOST")?,
                port: parse_number::<u16>(&env_map, "DB_PORT", "3306")?,
                user: required(&env_map, "DB_USER")?,
                password: env_map.get("DB_PASSWORD").cloned().unwrap_or_default(),
                database: required(&env_map, "DB_DATABASE")?,
            },
        };

        let connection_limit = parse_number::<u32>(&env_map, "DB_CONNECTION_LIMIT", "10")?;
        if connection_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_CONNECTION_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let acquire_timeout_secs = parse_number::<u64>(&env_map, "DB_ACQUIRE_TIMEOUT_SECS", "30")?;

        Ok(Config {
            host,
            port,
            database: DatabaseConfig {
                target,
                connection_limit,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_number<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|_| {
            ConfigError::InvalidValue(
                key.to_string(),
                format!("must be a valid {}", std::any::type_name::<T>()),
            )
        })
}
