//! Backend API client
//!
//! Every authenticated endpoint relies on the HttpOnly `session` cookie that
//! `POST /api/auth/validate` sets. On native targets the reqwest cookie store
//! keeps it; in the browser the request is sent with `credentials: include`
//! so the cookie crosses origins.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::http::{ApiClientConfig, ApiRequest, ApiResponse, ErrorBody, HttpMethod};
use crate::types::{AuthRequest, AuthResponse, HealthStatus, Preferences, PreferencesUpdate};
use crate::{ApiError, Result};

/// Client for the mini-app backend
///
/// # Examples
/// ```no_run
/// use api_client::{ApiClient, ApiClientConfig, PreferencesUpdate, ThemeMode};
///
/// async fn example() -> Result<(), api_client::ApiError> {
///     let client = ApiClient::new(ApiClientConfig::new("https://api.example.com"))?;
///
///     let auth = client.validate_init_data("query_id=...&hash=...").await?;
///     println!("Signed in as {}", auth.user.first_name);
///
///     let prefs = client
///         .update_preferences(&PreferencesUpdate::theme_mode(ThemeMode::Mixed))
///         .await?;
///     assert_eq!(prefs.theme_mode, ThemeMode::Mixed);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ReqwestClient,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must be http(s): {:?}",
                config.base_url
            )));
        }

        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Validate Telegram init data and establish the session cookie
    ///
    /// The init data is the raw signed string handed over by the host; the
    /// backend verifies its signature.
    pub async fn validate_init_data(&self, init_data: &str) -> Result<AuthResponse> {
        let request = ApiRequest::post("/api/auth/validate").json_body(&AuthRequest { init_data })?;
        Ok(self.execute(request).await?.data)
    }

    /// Fetch the stored preferences for the session user
    pub async fn preferences(&self) -> Result<Preferences> {
        Ok(self.execute(ApiRequest::get("/api/preferences")).await?.data)
    }

    /// Update preferences; the backend returns the full stored object
    pub async fn update_preferences(&self, update: &PreferencesUpdate) -> Result<Preferences> {
        let request = ApiRequest::put("/api/preferences").json_body(update)?;
        Ok(self.execute(request).await?.data)
    }

    /// Health probe; no session required
    ///
    /// An unhealthy backend still answers with a status body, so the body is
    /// decoded whatever the status code.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.send(ApiRequest::get("/api/health")).await?;
        Ok(self.decode(response).await?.data)
    }

    /// Execute a request, treating non-2xx responses as errors
    pub async fn execute<T>(&self, request: ApiRequest) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = ErrorBody::message(&body, status);
            tracing::debug!(status, %message, "backend request rejected");
            return Err(ApiError::Api { status, message });
        }

        self.decode(response).await
    }

    async fn send(&self, request: ApiRequest) -> Result<ReqwestResponse> {
        let ApiRequest { method, path, headers, body, encoding } = request;
        let url = self.config.url(&path);
        tracing::debug!(method = method.as_str(), %url, "backend request");

        let mut req = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
        };

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        for (key, value) in &headers {
            req = req.header(key, value);
        }

        if let Some(body) = body {
            if let Some(encoding) = encoding {
                req = req.header(CONTENT_TYPE, encoding);
            }
            req = req.body(body);
        }

        #[cfg(target_arch = "wasm32")]
        {
            req = req.fetch_credentials_include();
        }

        Ok(req.send().await?)
    }

    async fn decode<T>(&self, response: ReqwestResponse) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        let body = response.text().await?;
        let data: T = serde_json::from_str(&body)?;

        Ok(ApiResponse::new(status, headers, data))
    }

    /// Get the client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Get the backend base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(config: &ApiClientConfig) -> Result<ReqwestClient> {
    let client = ReqwestClient::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .cookie_store(config.cookie_store)
        .build()?;
    Ok(client)
}

// The browser owns timeouts, user agent and the cookie jar.
#[cfg(target_arch = "wasm32")]
fn build_http_client(_config: &ApiClientConfig) -> Result<ReqwestClient> {
    Ok(ReqwestClient::builder().build()?)
}
