//! Backend API client for TMA Studio
//!
//! This crate wraps the mini-app backend: Telegram init-data validation,
//! per-user preferences, and the health probe. Authentication is a session
//! cookie set by `POST /api/auth/validate` and sent back on every later request.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod http;
pub mod types;

pub use client::ApiClient;
pub use http::{ApiClientConfig, ApiRequest, ApiResponse, HttpMethod};
pub use types::{
    AuthResponse, AuthUser, HealthStatus, ParseThemeModeError, Preferences, PreferencesUpdate,
    ThemeMode,
};

/// Result type for backend API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error types for backend API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Non-2xx response from the backend
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error detail reported by the backend
        message: String,
    },
}

impl ApiError {
    /// HTTP status for backend-reported errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the request for lack of a valid session
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
