//! Theme management for TMA Studio
//!
//! [`ThemeManager`] keeps the active [`ThemeMode`] in memory, mirrors it into
//! the presentation layer and persists it through a [`PreferencesService`].
//! [`HostThemeSync`] keeps the host's color palette applied as CSS variables.
//!
//! # Example
//!
//! ```rust,no_run
//! use api_client::{ApiClient, ApiClientConfig};
//! use std::sync::Arc;
//! use theme_manager::{MemoryPresentation, ThemeManager, ThemeMode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(ApiClientConfig::from_env())?;
//! let themes = ThemeManager::new(Arc::new(api), Arc::new(MemoryPresentation::new()));
//!
//! themes.init().await;
//! themes.set(ThemeMode::Native).await;
//! assert_eq!(themes.current_mode(), ThemeMode::Native);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod host_sync;
pub mod manager;
pub mod preferences;
pub mod presentation;

pub use api_client::ThemeMode;
pub use host_sync::{apply_host_theme, css_variable_name, HostThemeSync};
pub use manager::{ThemeManager, ThemePhase, DEFAULT_THEME_MODE};
pub use preferences::PreferencesService;
#[cfg(target_arch = "wasm32")]
pub use presentation::DomPresentation;
pub use presentation::{MemoryPresentation, Presentation, PresentationError, THEME_ATTRIBUTE};
