//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_URL` - Base URL of the stock/product API (e.g., `http://localhost:3333`)
//!
//! ## Optional
//! - `CART_API_TOKEN` - Bearer token sent to the stock/product API
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: `@RocketShoes:cart`)
//! - `CART_STORAGE_PATH` - File backing the key-value store (default: `cart.json`)
//! - `CART_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Product metadata cache TTL (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::store::DEFAULT_STORAGE_KEY;

const DEFAULT_STORAGE_PATH: &str = "cart.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Stock/product API configuration
    pub api: StockApiConfig,
    /// Where the cart is persisted
    pub storage: StorageConfig,
}

/// Persistent storage configuration.
///
/// Loadable on its own so read-only tools do not need the API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key the serialized cart is stored under
    pub key: String,
    /// File backing the persistent key-value store
    pub path: PathBuf,
}

/// Stock/product API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct StockApiConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// How long product metadata stays cached
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for StockApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl StockApiConfig {
    /// Create an API configuration with default timeout and cache TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CART_API_URL", base_url)?,
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("CART_API_URL", &get_required_env("CART_API_URL")?)?;
        let token = get_optional_env("CART_API_TOKEN").map(SecretString::from);
        let request_timeout = get_secs_or_default(
            "CART_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let product_cache_ttl = get_secs_or_default(
            "CART_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            base_url,
            token,
            request_timeout,
            product_cache_ttl,
        })
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = StockApiConfig::from_env()?;
        let storage = StorageConfig::from_env()?;

        Ok(Self { api, storage })
    }
}

impl StorageConfig {
    /// Load storage settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `CART_STORAGE_KEY` is empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let path = PathBuf::from(get_env_or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        Ok(Self { key, path })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a whole number of seconds, falling back to `default` when unset.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(Duration::from_secs(default)), |value| {
        value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an API base URL.
///
/// A trailing slash is added so relative joins keep the last path segment.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
