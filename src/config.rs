//! Application configuration

use api_client::ApiClientConfig;

/// Environment variable holding the log filter directive
pub const LOG_FILTER_ENV: &str = "TMA_LOG";

/// Log filter used when `TMA_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// API base URL is not http(s)
    #[error("invalid API URL {0:?}: expected http:// or https://")]
    InvalidApiUrl(String),

    /// Log filter is empty
    #[error("log filter must not be empty")]
    EmptyLogFilter,
}

/// Top-level configuration for the mini-app
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend client settings
    pub api: ApiClientConfig,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { api: ApiClientConfig::default(), log_filter: DEFAULT_LOG_FILTER.to_string() }
    }
}

impl AppConfig {
    /// Create config for a backend at `api_url`
    pub fn new(api_url: impl Into<String>) -> Self {
        Self { api: ApiClientConfig::new(api_url), ..Self::default() }
    }

    /// Read `PUBLIC_API_URL`, `TMA_API_TIMEOUT_SECS` and `TMA_LOG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_filter = lookup(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let config = Self { api: ApiClientConfig::from_lookup(lookup), log_filter };
        config.validate()?;
        Ok(config)
    }

    /// Override the log filter
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Check values that cannot be fixed up silently
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(url.clone()));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }
}
