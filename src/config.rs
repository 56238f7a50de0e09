use std::env;

use chrono::Duration;
use thiserror::Error;

/// Shortest signing key accepted for HS256.
pub const MIN_SECRET_LEN: usize = 32;
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 60 * 60 * 24;
/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be a positive number, got `{1}`")]
    NotANumber(&'static str, String),
    #[error("JWT_SECRET must be at least {} bytes", MIN_SECRET_LEN)]
    SecretTooShort,
    #[error("token time-to-live must be positive")]
    NonPositiveTtl,
    #[error("JWT_EXPIRATION_SECONDS must be at most {max}, got `{0}`", max = MAX_TOKEN_TTL_SECONDS)]
    TtlTooLong(u64),
}

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }
        let jwt_ttl_seconds = parse_or("JWT_EXPIRATION_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if jwt_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::TtlTooLong(jwt_ttl_seconds));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port: parse_or("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_ttl_seconds,
        })
    }

    /// Token lifetime. `from_env` bounds the seconds, so the conversion cannot overflow.
    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.jwt_ttl_seconds as i64)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) if value != T::default() => Ok(value),
            _ => Err(ConfigError::NotANumber(key, raw)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything lives in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::remove_var("JWT_SECRET");
        assert_eq!(Config::from_env().unwrap_err(), ConfigError::Missing("JWT_SECRET"));

        env::set_var("JWT_SECRET", "too-short");
        assert_eq!(Config::from_env().unwrap_err(), ConfigError::SecretTooShort);

        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("JWT_EXPIRATION_SECONDS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_ttl_seconds, 86400);

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("JWT_EXPIRATION_SECONDS", "2");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_ttl_seconds, 2);
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");

        assert_eq!(config.token_ttl(), Duration::seconds(2));

        env::set_var("JWT_EXPIRATION_SECONDS", "18446744073709551615");
        assert_eq!(
            Config::from_env().unwrap_err(),
            ConfigError::TtlTooLong(u64::MAX)
        );

        env::set_var("JWT_EXPIRATION_SECONDS", (MAX_TOKEN_TTL_SECONDS + 1).to_string());
        assert!(matches!(Config::from_env(), Err(ConfigError::TtlTooLong(_))));

        env::set_var("JWT_EXPIRATION_SECONDS", MAX_TOKEN_TTL_SECONDS.to_string());
        assert_eq!(
            Config::from_env().unwrap().token_ttl(),
            Duration::seconds(MAX_TOKEN_TTL_SECONDS as i64)
        );

        env::set_var("JWT_EXPIRATION_SECONDS", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::NotANumber("JWT_EXPIRATION_SECONDS", _))
        ));
        env::remove_var("JWT_EXPIRATION_SECONDS");
    }
}
