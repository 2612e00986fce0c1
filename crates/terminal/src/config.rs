//! Terminal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `POS_BACKEND_URL` - POS backend origin (default: `http://localhost:8081`).
//!   Trailing slashes are trimmed.
//! - `POS_BACKEND_FLAVOR` - Backend convention: `rest` (default) or `legacy`
//!   (the servlet-style `?option=` API)
//! - `POS_BACKEND_TOKEN` - Bearer token sent with every backend request
//! - `TERMINAL_HOST` - Bind address (default: 127.0.0.1)
//! - `TERMINAL_PORT` - Listen port (default: 3000)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default backend origin when `POS_BACKEND_URL` is unset.
const DEFAULT_BACKEND_URL: &str = "http://localhost:8081";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Terminal application configuration.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// POS backend configuration
    pub backend: BackendConfig,
}

/// POS backend API configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Backend origin, without a trailing slash (e.g. `http://localhost:8081`)
    pub base_url: String,
    /// Which of the known backend conventions to speak
    pub flavor: BackendFlavor,
    /// Optional bearer token for backends that require one
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("flavor", &self.flavor)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// The two backend URL conventions seen in the wild.
///
/// `Rest` is the canonical `/api/customers`-style surface. `Legacy` is the
/// older servlet convention (`customer?option=GetAll`, `item?option=SaveItem`,
/// ...), which is read-only for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendFlavor {
    #[default]
    Rest,
    Legacy,
}

impl FromStr for BackendFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown backend flavor '{other}' (expected rest or legacy)")),
        }
    }
}

impl TerminalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TERMINAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TERMINAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TERMINAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TERMINAL_PORT".to_string(), e.to_string()))?;

        let backend = BackendConfig::from_env()?;

        Ok(Self {
            host,
            port,
            backend,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_env_or_default("POS_BACKEND_URL", DEFAULT_BACKEND_URL);
        let base_url = normalize_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("POS_BACKEND_URL".to_string(), e))?;

        let flavor = match get_optional_env("POS_BACKEND_FLAVOR") {
            Some(raw) => raw
                .parse::<BackendFlavor>()
                .map_err(|e| ConfigError::InvalidEnvVar("POS_BACKEND_FLAVOR".to_string(), e))?,
            None => BackendFlavor::default(),
        };

        let api_token = get_optional_env("POS_BACKEND_TOKEN").map(SecretString::from);

        Ok(Self {
            base_url,
            flavor,
            api_token,
        })
    }
}

/// Validate and normalize the backend origin: must parse as an HTTP(S) URL,
/// trailing slashes are stripped so endpoints can be joined uniformly.
fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err("backend URL is empty".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_trims_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:8081///").unwrap(),
            "http://localhost:8081"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8081/Pos_JavaEE/").unwrap(),
            "http://localhost:8081/Pos_JavaEE"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_backend_flavor_parse() {
        assert_eq!("rest".parse::<BackendFlavor>().unwrap(), BackendFlavor::Rest);
        assert_eq!(
            "LEGACY".parse::<BackendFlavor>().unwrap(),
            BackendFlavor::Legacy
        );
        assert!("soap".parse::<BackendFlavor>().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = TerminalConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_URL.to_string(),
                flavor: BackendFlavor::Rest,
                api_token: None,
            },
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_backend_config_debug_redacts_token() {
        let config = BackendConfig {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            flavor: BackendFlavor::Rest,
            api_token: Some(SecretString::from("super_secret_token")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:8081"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
