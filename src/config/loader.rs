//! Configuration Loader
//!
//! Loads and validates gateway configuration from TOML files. Secrets
//! and the runtime environment can be overridden through the process
//! environment (`COINGECKO_API_KEY`, `APP_ENV`) so they stay out of
//! committed config files.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Main configuration structure matching gateway.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub providers: ProvidersSection,
    #[serde(default)]
    pub timeouts: TimeoutsSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub dev_cache: DevCacheSection,
    #[serde(default)]
    pub indexnow: Option<IndexNowSection>,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// HTTP listener section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Runtime environment, gating the development cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

impl Default for RuntimeEnv {
    fn default() -> Self {
        RuntimeEnv::Development
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSection {
    #[serde(default)]
    pub environment: RuntimeEnv,
}

impl RuntimeSection {
    /// Environment with `APP_ENV` override ("production"/"prod" or
    /// "development"/"dev"); unknown values fall back to the config file
    pub fn resolved_environment(&self) -> RuntimeEnv {
        match std::env::var("APP_ENV") {
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "production" | "prod" => RuntimeEnv::Production,
                "development" | "dev" => RuntimeEnv::Development,
                other => {
                    tracing::warn!("unrecognized APP_ENV value '{other}', using config file");
                    self.environment
                }
            },
            Err(_) => self.environment,
        }
    }
}

/// Upstream provider endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersSection {
    #[serde(default)]
    pub coingecko: CoinGeckoSection,
    #[serde(default = "default_binance")]
    pub binance: EndpointSection,
    #[serde(default = "default_okx")]
    pub okx: EndpointSection,
    #[serde(default = "default_dexscreener")]
    pub dexscreener: EndpointSection,
    #[serde(default = "default_geckoterminal")]
    pub geckoterminal: EndpointSection,
}

impl Default for ProvidersSection {
    fn default() -> Self {
        Self {
            coingecko: CoinGeckoSection::default(),
            binance: default_binance(),
            okx: default_okx(),
            dexscreener: default_dexscreener(),
            geckoterminal: default_geckoterminal(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoSection {
    #[serde(default = "default_coingecko_url")]
    pub base_url: String,
    /// Demo or pro key; the resolver decides how to send it per call
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for CoinGeckoSection {
    fn default() -> Self {
        Self {
            base_url: default_coingecko_url(),
            api_key: None,
        }
    }
}

impl CoinGeckoSection {
    /// Key from config, falling back to the COINGECKO_API_KEY env var
    pub fn resolved_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("COINGECKO_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointSection {
    pub base_url: String,
}

/// Outbound deadlines by call class
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutsSection {
    /// Simple metadata calls (trending, global stats, coin detail)
    #[serde(default = "default_metadata_secs")]
    pub metadata_secs: u64,
    /// Heavier listing/aggregation calls (markets pages, passthrough)
    #[serde(default = "default_listing_secs")]
    pub listing_secs: u64,
}

impl Default for TimeoutsSection {
    fn default() -> Self {
        Self {
            metadata_secs: default_metadata_secs(),
            listing_secs: default_listing_secs(),
        }
    }
}

/// Rate-limit cache tuning
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// TTL for highly dynamic data (order books, trending lists)
    #[serde(default = "default_volatile_ttl")]
    pub volatile_ttl_secs: u64,
    /// TTL for slow-moving data (global stats, coin detail)
    #[serde(default = "default_steady_ttl")]
    pub steady_ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            volatile_ttl_secs: default_volatile_ttl(),
            steady_ttl_secs: default_steady_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

/// Development persistent cache. Never consulted in production.
#[derive(Debug, Clone, Deserialize)]
pub struct DevCacheSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dev_cache_path")]
    pub path: String,
    #[serde(default = "default_dev_cache_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for DevCacheSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_dev_cache_path(),
            ttl_hours: default_dev_cache_ttl_hours(),
        }
    }
}

/// Search-index push notification section (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct IndexNowSection {
    /// Site host the submitted URLs belong to
    pub host: String,
    /// Ownership key, also served at /<key>.txt
    pub key: String,
    #[serde(default = "default_indexnow_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}
fn default_binance() -> EndpointSection {
    EndpointSection {
        base_url: "https://api.binance.com".to_string(),
    }
}
fn default_okx() -> EndpointSection {
    EndpointSection {
        base_url: "https://www.okx.com".to_string(),
    }
}
fn default_dexscreener() -> EndpointSection {
    EndpointSection {
        base_url: "https://api.dexscreener.com".to_string(),
    }
}
fn default_geckoterminal() -> EndpointSection {
    EndpointSection {
        base_url: "https://api.geckoterminal.com/api/v2".to_string(),
    }
}
fn default_metadata_secs() -> u64 {
    10
}
fn default_listing_secs() -> u64 {
    30
}
fn default_volatile_ttl() -> u64 {
    30
}
fn default_steady_ttl() -> u64 {
    300
}
fn default_max_entries() -> usize {
    2048
}
fn default_true() -> bool {
    true
}
fn default_dev_cache_path() -> String {
    "data/dev_cache.json".to_string()
}
fn default_dev_cache_ttl_hours() -> u64 {
    24
}
fn default_indexnow_endpoint() -> String {
    "https://api.indexnow.org/indexnow".to_string()
}
fn default_batch_limit() -> usize {
    500
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoints = [
            ("providers.coingecko", &self.providers.coingecko.base_url),
            ("providers.binance", &self.providers.binance.base_url),
            ("providers.okx", &self.providers.okx.base_url),
            ("providers.dexscreener", &self.providers.dexscreener.base_url),
            (
                "providers.geckoterminal",
                &self.providers.geckoterminal.base_url,
            ),
        ];
        for (name, url) in endpoints {
            if url.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{name}.base_url cannot be empty"
                )));
            }
        }

        if self.timeouts.metadata_secs == 0 || self.timeouts.listing_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be > 0 seconds".to_string(),
            ));
        }

        if self.cache.volatile_ttl_secs == 0 || self.cache.steady_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache TTLs must be > 0 seconds".to_string(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be > 0".to_string(),
            ));
        }

        if self.dev_cache.enabled && self.dev_cache.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "dev_cache.path cannot be empty when enabled".to_string(),
            ));
        }

        if self.dev_cache.ttl_hours == 0 {
            return Err(ConfigError::ValidationError(
                "dev_cache.ttl_hours must be > 0".to_string(),
            ));
        }

        if let Some(ref indexnow) = self.indexnow {
            if indexnow.host.is_empty() {
                return Err(ConfigError::ValidationError(
                    "indexnow.host cannot be empty".to_string(),
                ));
            }
            if indexnow.key.is_empty() {
                return Err(ConfigError::ValidationError(
                    "indexnow.key cannot be empty".to_string(),
                ));
            }
            if indexnow.batch_limit == 0 {
                return Err(ConfigError::ValidationError(
                    "indexnow.batch_limit must be > 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 9090

[runtime]
environment = "production"

[providers.coingecko]
base_url = "https://api.coingecko.com/api/v3"
api_key = "CG-test123"

[timeouts]
metadata_secs = 10
listing_secs = 30

[cache]
volatile_ttl_secs = 30
steady_ttl_secs = 300
max_entries = 1000

[dev_cache]
enabled = true
path = "data/dev_cache.json"
ttl_hours = 24

[indexnow]
host = "news.example.com"
key = "abc123def456"
batch_limit = 500

[logging]
level = "info"
"#
        .to_string()
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(create_valid_config().as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.runtime.environment, RuntimeEnv::Production);
        assert_eq!(
            config.providers.coingecko.api_key.as_deref(),
            Some("CG-test123")
        );
        assert_eq!(config.indexnow.as_ref().unwrap().batch_limit, 500);
        assert_eq!(
            config.indexnow.as_ref().unwrap().endpoint,
            "https://api.indexnow.org/indexnow"
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 3000\n").unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.runtime.environment, RuntimeEnv::Development);
        assert_eq!(config.providers.binance.base_url, "https://api.binance.com");
        assert_eq!(config.cache.volatile_ttl_secs, 30);
        assert_eq!(config.dev_cache.ttl_hours, 24);
        assert!(config.indexnow.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/gateway.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_empty_provider_url_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[providers.binance]\nbase_url = \"\"\n")
            .unwrap();

        let result = load_config(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_zero_cache_ttl_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[cache]\nvolatile_ttl_secs = 0\n").unwrap();

        let result = load_config(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_indexnow_requires_key() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[indexnow]\nhost = \"example.com\"\nkey = \"\"\n")
            .unwrap();

        let result = load_config(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_config_key_takes_precedence_over_env() {
        let section = CoinGeckoSection {
            base_url: default_coingecko_url(),
            api_key: Some("CG-from-config".to_string()),
        };
        assert_eq!(
            section.resolved_api_key().as_deref(),
            Some("CG-from-config")
        );
    }

    #[test]
    fn test_empty_config_key_falls_back() {
        let section = CoinGeckoSection {
            base_url: default_coingecko_url(),
            api_key: Some(String::new()),
        };
        // No env var set in tests, so an empty config key resolves to none.
        if std::env::var("COINGECKO_API_KEY").is_err() {
            assert_eq!(section.resolved_api_key(), None);
        }
    }
}
