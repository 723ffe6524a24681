//! Configuration management for the MCP server.
//!
//! Configuration is loaded once at startup (defaults, then `.env`, then the
//! process environment) and is immutable afterwards. Components receive the
//! pieces they need at construction time.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default openFDA drug API root.
pub const DEFAULT_OPENFDA_BASE_URL: &str = "https://api.fda.gov/drug";

/// Default single-attempt timeout for upstream requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Prompts domain configuration.
    pub prompts: PromptsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// openFDA endpoint configuration.
    pub upstream: UpstreamConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the prompts domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    // Prompts are registered in domains/prompts/registry.rs
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Touches nothing but the environment, so it can run before the
    /// subscriber exists and the rest of [`Config::from_env`] gets logged.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = timestamps.parse().unwrap_or(true);
        }

        logging
    }
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// openFDA API key. Optional: without one, requests are made
    /// anonymously under the lower public rate limit.
    /// Get a key at: https://open.fda.gov/apis/authentication/
    pub openfda_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "openfda_api_key",
                &self.openfda_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Where and how the openFDA API is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Root of the drug API; collections are appended as `/{name}.json`.
    pub base_url: String,

    /// Timeout applied to the single request made per tool call.
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENFDA_BASE_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "openfda-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            prompts: PromptsConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, ...). The API key keeps its conventional name,
    /// `OPENFDA_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // An empty key counts as no key.
        match std::env::var("OPENFDA_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.credentials.openfda_api_key = Some(api_key);
                info!("openFDA API key loaded from environment");
            }
            _ => {
                warn!(
                    "OPENFDA_API_KEY not set - using anonymous openFDA access \
                     (lower rate limits apply)"
                );
            }
        }

        if let Ok(base_url) = std::env::var("MCP_OPENFDA_BASE_URL") {
            config.upstream.base_url = base_url.trim_end_matches('/').to_string();
            info!("openFDA base URL overridden: {}", config.upstream.base_url);
        }

        if let Ok(timeout) = std::env::var("MCP_OPENFDA_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.upstream.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_OPENFDA_TIMEOUT_SECS={:?}, keeping {}s",
                    timeout, config.upstream.timeout_secs
                ),
            }
        }

        config
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        let base = &self.upstream.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::config(format!(
                "openFDA base URL must be http(s), got {:?}",
                base
            )));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::config("upstream timeout must be at least 1 second"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_api_key_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("OPENFDA_API_KEY", "test_key_12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.openfda_api_key.as_deref(),
            Some("test_key_12345")
        );
        unsafe {
            std::env::remove_var("OPENFDA_API_KEY");
        }
    }

    #[test]
    fn test_empty_api_key_is_absent() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("OPENFDA_API_KEY", "");
        }
        let config = Config::from_env();
        assert!(config.credentials.openfda_api_key.is_none());
        unsafe {
            std::env::remove_var("OPENFDA_API_KEY");
        }
    }

    #[test]
    fn test_upstream_overrides() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_OPENFDA_BASE_URL", "http://127.0.0.1:9999/drug/");
            std::env::set_var("MCP_OPENFDA_TIMEOUT_SECS", "nope");
        }
        let config = Config::from_env();
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9999/drug");
        assert_eq!(config.upstream.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        unsafe {
            std::env::remove_var("MCP_OPENFDA_BASE_URL");
            std::env::remove_var("MCP_OPENFDA_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "false");
        }
        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "debug");
        assert!(!logging.with_timestamps);

        let config = Config::from_env();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.with_timestamps);
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
            std::env::remove_var("MCP_LOG_TIMESTAMPS");
        }
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.upstream.base_url = "ftp://api.fda.gov/drug".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            openfda_api_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_config_default_has_no_key() {
        let config = Config::default();
        assert!(config.credentials.openfda_api_key.is_none());
        assert_eq!(config.upstream.base_url, DEFAULT_OPENFDA_BASE_URL);
        assert_eq!(config.upstream.timeout(), Duration::from_secs(30));
    }
}
