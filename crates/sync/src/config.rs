//! Catalog connection settings.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::time::Duration;

use thiserror::Error;

use storefront_products::CategoryFallback;

pub const DEFAULT_API_URL: &str = "https://api.escuelajs.co/api/v1";

pub const ENV_API_URL: &str = "CATALOG_API_URL";
pub const ENV_READ_TIMEOUT: &str = "CATALOG_READ_TIMEOUT_SECS";
pub const ENV_WRITE_TIMEOUT: &str = "CATALOG_WRITE_TIMEOUT_SECS";
pub const ENV_CATEGORY_TTL: &str = "CATALOG_CATEGORY_TTL_SECS";
pub const ENV_STRICT_CATEGORIES: &str = "CATALOG_STRICT_CATEGORIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL of the remote catalog, without a trailing slash.
    pub api_url: String,

    /// Timeout for GET calls.
    pub read_timeout: Duration,

    /// Timeout for POST/PUT/DELETE calls.
    pub write_timeout: Duration,

    /// How long a fetched category list stays fresh. Zero disables caching.
    pub category_ttl: Duration,

    /// Policy for category references that match nothing.
    pub category_fallback: CategoryFallback,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            category_ttl: Duration::from_secs(300),
            category_fallback: CategoryFallback::default(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl CatalogConfig {
    /// Point the config at another base URL (tests, staging mirrors).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Missing keys keep their
    /// defaults; present but malformed values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_API_URL,
                    value: url.to_string(),
                    reason: "expected an http(s) URL",
                });
            }
            config = config.with_api_url(url);
        }

        if let Some(raw) = lookup(ENV_READ_TIMEOUT) {
            config.read_timeout = parse_timeout(ENV_READ_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WRITE_TIMEOUT) {
            config.write_timeout = parse_timeout(ENV_WRITE_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CATEGORY_TTL) {
            config.category_ttl = Duration::from_secs(parse_secs(ENV_CATEGORY_TTL, &raw)?);
        }
        if let Some(raw) = lookup(ENV_STRICT_CATEGORIES) {
            if parse_bool(ENV_STRICT_CATEGORIES, &raw)? {
                config.category_fallback = CategoryFallback::Reject;
            }
        }

        Ok(config)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: "expected whole seconds",
    })
}

fn parse_timeout(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match parse_secs(key, raw)? {
        0 => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "timeout must be at least one second",
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected true or false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn overrides_are_applied() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:3000/api/v1/"),
            (ENV_READ_TIMEOUT, "2"),
            (ENV_WRITE_TIMEOUT, " 4 "),
            (ENV_CATEGORY_TTL, "0"),
            (ENV_STRICT_CATEGORIES, "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:3000/api/v1");
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.write_timeout, Duration::from_secs(4));
        assert_eq!(config.category_ttl, Duration::ZERO);
        assert_eq!(config.category_fallback, CategoryFallback::Reject);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = CatalogConfig::from_lookup(lookup(&[(ENV_READ_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_READ_TIMEOUT, .. }));

        assert!(CatalogConfig::from_lookup(lookup(&[(ENV_WRITE_TIMEOUT, "0")])).is_err());
        assert!(CatalogConfig::from_lookup(lookup(&[(ENV_API_URL, "ftp://x")])).is_err());
        assert!(CatalogConfig::from_lookup(lookup(&[(ENV_STRICT_CATEGORIES, "maybe")])).is_err());
    }
}
