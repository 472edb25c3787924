//! TMA Studio client core
//!
//! Ties the host bridge, the backend client and the theme manager into one
//! startup sequence.
//!
//! # Crates
//!
//! - [`api_client`] - HTTP client for the TMA Studio backend
//! - [`host_bridge`] - Telegram WebApp adapter with null and in-memory variants
//! - [`theme_manager`] - theme state, presentation layer and host color sync
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use theme_manager::MemoryPresentation;
//! use tma_studio::{telemetry, AppConfig, MiniApp};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! telemetry::init(&config.log_filter)?;
//!
//! let mut app = MiniApp::new(&config, host_bridge::detect(), Arc::new(MemoryPresentation::new()))?;
//! app.start().await;
//! println!("theme: {}", app.theme().current_mode());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::{AppError, MiniApp};
pub use config::{AppConfig, ConfigError};

pub use api_client;
pub use host_bridge;
pub use theme_manager;
