//! Request/response plumbing for the backend API
//!
//! Provides the request builder, response wrapper, client configuration and
//! the error-body format the backend (FastAPI) returns on failure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default backend URL when `PUBLIC_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://api.yourdomain.com";

/// Environment variable holding the backend base URL
pub const API_URL_ENV: &str = "PUBLIC_API_URL";

/// Environment variable holding the request timeout in seconds
pub const API_TIMEOUT_ENV: &str = "TMA_API_TIMEOUT_SECS";

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for backend requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A request to a backend endpoint
///
/// # Examples
/// ```
/// use api_client::{ApiRequest, HttpMethod};
///
/// let req = ApiRequest::get("/api/preferences").header("X-Trace", "1");
/// assert_eq!(req.method, HttpMethod::Get);
/// assert_eq!(req.path, "/api/preferences");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL (e.g., "/api/preferences")
    pub path: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub body: Option<Vec<u8>>,
    /// Content type of the body
    pub encoding: Option<String>,
}

impl ApiRequest {
    /// Create a request with the given method and path
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            encoding: None,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body from JSON
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.encoding = Some("application/json".to_string());
        Ok(self)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Decoded response from a backend endpoint
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercase names)
    pub headers: HashMap<String, String>,
    /// Decoded body
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a new response
    pub fn new(status: u16, headers: HashMap<String, String>, data: T) -> Self {
        Self { status, headers, data }
    }
}

/// Error body returned by the backend on failure: `{"detail": ...}`
///
/// `detail` is a string for handled errors and a list of objects for request
/// validation failures, so it is kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable message, falling back to the status line
    pub(crate) fn message(body: &str, status: u16) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.detail.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status))
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for [`crate::ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Request timeout (native targets only)
    pub timeout: Duration,
    /// User agent string (native targets only)
    pub user_agent: String,
    /// Headers added to every request
    pub default_headers: HashMap<String, String>,
    /// Keep and resend session cookies
    pub cookie_store: bool,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("TMA-Studio/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            cookie_store: true,
        }
    }
}

impl ApiClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Read `PUBLIC_API_URL` and `TMA_API_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        };

        if let Some(raw) = lookup(API_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring invalid {}={:?}", API_TIMEOUT_ENV, raw),
            }
        }

        config
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Enable or disable the session cookie store
    pub fn with_cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::get("/api/preferences").header("X-Custom", "value");

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.headers.get("X-Custom"), Some(&"value".to_string()));
        assert!(req.body.is_none());

        let req = ApiRequest::put("/api/preferences")
            .json_body(&serde_json::json!({ "theme_mode": "native" }))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.encoding.as_deref(), Some("application/json"));
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.contains("native"));
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(ErrorBody::message(r#"{"detail":"Not authenticated"}"#, 401), "Not authenticated");
        // Validation errors carry a list, not a string
        assert_eq!(
            ErrorBody::message(r#"{"detail":[{"loc":["body"],"msg":"field required"}]}"#, 422),
            "HTTP 422"
        );
        assert_eq!(ErrorBody::message("<html>Bad Gateway</html>", 502), "HTTP 502");
    }

    #[test]
    fn test_config_default() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("TMA-Studio/"));
        assert!(config.cookie_store);
    }

    #[test]
    fn test_config_builder() {
        let config = ApiClientConfig::new("https://api.example.com/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("Test/1.0")
            .with_header("X-Client", "mini-app")
            .with_cookie_store(false);

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.url("/api/health"), "https://api.example.com/api/health");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "Test/1.0");
        assert_eq!(config.default_headers.get("X-Client"), Some(&"mini-app".to_string()));
        assert!(!config.cookie_store);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ApiClientConfig::from_lookup(|key| match key {
            API_URL_ENV => Some("http://localhost:8000".to_string()),
            API_TIMEOUT_ENV => Some("7".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(7));

        let config = ApiClientConfig::from_lookup(|key| match key {
            API_URL_ENV => Some("  ".to_string()),
            API_TIMEOUT_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
