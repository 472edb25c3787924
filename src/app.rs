//! Mini-app bootstrap

use api_client::{ApiClient, ApiError, AuthUser};
use host_bridge::HostBridge;
use std::sync::Arc;
use theme_manager::{HostThemeSync, Presentation, ThemeManager};

use crate::config::{AppConfig, ConfigError};

/// Errors raised while wiring the app together
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The running mini-app: host bridge, backend client and theme state
pub struct MiniApp {
    bridge: Arc<dyn HostBridge>,
    api: Arc<ApiClient>,
    presentation: Arc<dyn Presentation>,
    theme: Arc<ThemeManager>,
    host_sync: Option<HostThemeSync>,
    user: Option<AuthUser>,
}

impl MiniApp {
    /// Build from configuration
    pub fn new(
        config: &AppConfig,
        bridge: Arc<dyn HostBridge>,
        presentation: Arc<dyn Presentation>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let api = ApiClient::new(config.api.clone())?;
        Ok(Self::with_client(api, bridge, presentation))
    }

    /// Build around an existing client
    pub fn with_client(
        api: ApiClient,
        bridge: Arc<dyn HostBridge>,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        let api = Arc::new(api);
        let theme = Arc::new(ThemeManager::new(api.clone(), presentation.clone()));
        Self { bridge, api, presentation, theme, host_sync: None, user: None }
    }

    /// Run the startup sequence
    ///
    /// Signals readiness, authenticates with the host's signed init data when
    /// a host is present, loads the stored theme and starts following host
    /// colors. Failures along the way are logged and startup continues.
    pub async fn start(&mut self) {
        self.bridge.ready();
        self.bridge.expand();

        if self.bridge.is_available() {
            self.authenticate().await;
        } else {
            tracing::debug!("No host present, skipping authentication");
        }

        self.theme.init().await;
        tracing::info!(theme = %self.theme.current_mode(), "Theme initialized");

        if self.host_sync.is_none() {
            self.host_sync = Some(HostThemeSync::attach(self.bridge.clone(), self.presentation.clone()));
        }
    }

    async fn authenticate(&mut self) {
        let init_data = self.bridge.init_data();
        if init_data.is_empty() {
            tracing::warn!("Host provided no init data, continuing unauthenticated");
            return;
        }

        match self.api.validate_init_data(&init_data).await {
            Ok(auth) if auth.success => {
                tracing::info!(user_id = auth.user.telegram_id, "Authenticated with backend");
                self.user = Some(auth.user);
            }
            Ok(_) => tracing::warn!("Backend rejected init data"),
            Err(e) => tracing::warn!(error = %e, "Failed to validate init data"),
        }
    }

    /// Host bridge in use
    pub fn bridge(&self) -> &Arc<dyn HostBridge> {
        &self.bridge
    }

    /// Backend client
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Theme state owner
    pub fn theme(&self) -> &Arc<ThemeManager> {
        &self.theme
    }

    /// User confirmed by the backend, if authentication succeeded
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Whether host color changes are still being applied
    pub fn is_following_host_theme(&self) -> bool {
        self.host_sync.as_ref().is_some_and(HostThemeSync::is_attached)
    }

    /// Stop following host colors
    pub fn stop_host_sync(&mut self) {
        self.host_sync = None;
    }
}

impl std::fmt::Debug for MiniApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniApp")
            .field("base_url", &self.api.base_url())
            .field("theme", &self.theme)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
