//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_URL` - Base URL of the catalog/blog/order REST backend
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_AUTH_COOKIE` - Name of the auth token cookie (default: token)
//! - `STOREFRONT_LOGIN_URL` - Where signed-out visitors are sent (default: /login)
//! - `STOREFRONT_CACHE_TTL_SECS` - Backend response cache TTL (default: 300)
//! - `STOREFRONT_VISITOR_IDLE_SECS` - Idle time before visitor state is dropped (default: 1800)
//! - `STOREFRONT_API_TIMEOUT_SECS` - Backend request timeout (default: none)
//! - `STOREFRONT_LOG_FORMAT` - `json` for JSON logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Auth cookie and login redirect
    pub auth: AuthConfig,
    /// Idle time after which a visitor's state is evicted
    pub visitor_idle: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are appended to
    pub base_url: Url,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// TTL for cached single-document lookups
    pub cache_ttl: Duration,
}

/// Auth token cookie settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Cookie holding the customer's auth token
    pub cookie_name: String,
    /// Login page for signed-out visitors
    pub login_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            login_url: "/login".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Sentry settings. Sentry is disabled when `dsn` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
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

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(vars);

        let host = env.parsed_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parsed_or("STOREFRONT_PORT", 3000_u16)?;
        let base_url = env.url("STOREFRONT_BASE_URL")?;

        let api = ApiConfig {
            base_url: env.url("STOREFRONT_API_URL")?,
            timeout: env
                .parsed::<u64>("STOREFRONT_API_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            cache_ttl: Duration::from_secs(env.parsed_or("STOREFRONT_CACHE_TTL_SECS", 300)?),
        };

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            cookie_name: env.optional("STOREFRONT_AUTH_COOKIE").unwrap_or(defaults.cookie_name),
            login_url: env.optional("STOREFRONT_LOGIN_URL").unwrap_or(defaults.login_url),
        };

        let visitor_idle =
            Duration::from_secs(env.parsed_or("STOREFRONT_VISITOR_IDLE_SECS", 1800)?);

        let log_format = match env.optional("STOREFRONT_LOG_FORMAT").as_deref() {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            api,
            auth,
            visitor_idle,
            log_format,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse an optional variable.
    fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|value| {
                value
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    /// Parse a variable, falling back to a default when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parsed(key)?.unwrap_or(default))
    }

    /// Get a required `http` or `https` URL.
    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        let raw = self.required(key)?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        Ok(url)
    }
}
