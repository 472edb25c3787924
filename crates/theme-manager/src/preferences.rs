//! Backend preferences port
//!
//! The theme manager only needs two calls from the backend. Keeping them
//! behind a trait lets tests and alternative backends stand in for
//! [`ApiClient`].

use api_client::{ApiClient, ApiError, Preferences, PreferencesUpdate};
use async_trait::async_trait;

/// Remote store for per-user preferences
///
/// Both calls require an authenticated session; failures are reported as
/// [`ApiError`] and never retried here.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PreferencesService: Send + Sync {
    /// Fetch the stored preferences
    async fn get_preferences(&self) -> Result<Preferences, ApiError>;

    /// Apply a partial update and return the full stored object
    async fn update_preferences(&self, update: PreferencesUpdate) -> Result<Preferences, ApiError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PreferencesService for ApiClient {
    async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        self.preferences().await
    }

    async fn update_preferences(&self, update: PreferencesUpdate) -> Result<Preferences, ApiError> {
        ApiClient::update_preferences(self, &update).await
    }
}
