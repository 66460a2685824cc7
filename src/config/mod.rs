use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Secret used when JWT_SECRET is not set. Refused in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    /// Environment values that could not be parsed; `validate` rejects them.
    #[serde(skip)]
    pub rejected_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    /// `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("JWT_SECRET must be set in production")]
    InsecureSecret,

    #[error("JWT_SECRET cannot be empty")]
    EmptySecret,

    #[error("BCRYPT_COST must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),

    #[error("JWT_EXPIRY_MINUTES must be positive, got {0}")]
    InvalidTokenExpiry(i64),
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. `from_env` passes
    /// the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = self.parse_override("PORT", v, self.server.port);
        }
        if let Some(v) = lookup("RUST_LOG") {
            self.server.log_filter = v;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                self.parse_override("DATABASE_MAX_CONNECTIONS", v, self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                self.parse_override("DATABASE_CONNECTION_TIMEOUT", v, self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes =
                self.parse_override("JWT_EXPIRY_MINUTES", v, self.security.jwt_expiry_minutes);
        }
        if let Some(v) = lookup("CORS_ORIGIN") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            self.security.bcrypt_cost = self.parse_override("BCRYPT_COST", v, self.security.bcrypt_cost);
        }

        self
    }

    /// Parsed `raw`, or `current` with the failure recorded for `validate`.
    fn parse_override<T: FromStr>(&mut self, key: &str, raw: String, current: T) -> T {
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}", key, raw);
                self.rejected_overrides.push((key.to_string(), raw));
                current
            }
        }
    }

    /// Rejects settings the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.rejected_overrides.first() {
            return Err(ConfigError::InvalidValue {
                key: key.clone(),
                value: value.clone(),
            });
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.environment == Environment::Production && self.security.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::InsecureSecret);
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.security.bcrypt_cost));
        }
        if self.security.jwt_expiry_minutes <= 0 {
            return Err(ConfigError::InvalidTokenExpiry(self.security.jwt_expiry_minutes));
        }
        Ok(())
    }

    pub fn allows_any_origin(&self) -> bool {
        self.security.cors_origins.is_empty() || self.security.cors_origins.iter().any(|o| o == "*")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                log_filter: "info,filmes_api=debug,tower_http=debug".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://data/filmes.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_minutes: 20,
                cors_origins: vec!["*".to_string()],
                bcrypt_cost: 10,
            },
            rejected_overrides: Vec::new(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                log_filter: "info,tower_http=info".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://data/filmes.db".to_string(),
                max_connections: 10,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_minutes: 20,
                cors_origins: vec!["*".to_string()],
                bcrypt_cost: 12,
            },
            rejected_overrides: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.jwt_expiry_minutes, 20);
        assert!(config.allows_any_origin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGIN", "http://a.test, http://b.test"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!config.allows_any_origin());
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_unparseable_override_fails_validation() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                key: "PORT".into(),
                value: "not-a-port".into()
            })
        );
    }

    #[test]
    fn test_every_numeric_override_is_checked() {
        for key in [
            "DATABASE_MAX_CONNECTIONS",
            "DATABASE_CONNECTION_TIMEOUT",
            "JWT_EXPIRY_MINUTES",
            "BCRYPT_COST",
        ] {
            let config = AppConfig::from_lookup(lookup_from(&[(key, "abc")]));
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue { key: k, .. }) if k == key),
                "{key} should be rejected"
            );
        }

        let config = AppConfig::from_lookup(lookup_from(&[("BCRYPT_COST", " 8 ")]));
        assert_eq!(config.security.bcrypt_cost, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "production")]));
        assert_eq!(config.validate(), Err(ConfigError::InsecureSecret));

        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "a-real-secret"),
        ]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = AppConfig::development();
        config.security.bcrypt_cost = 3;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBcryptCost(3)));
    }
}
