//! Host bridge adapter for TMA Studio
//!
//! The mini-app runs inside Telegram, which injects a `WebApp` object with UI
//! chrome controls, haptics, theme data and signed launch parameters. This
//! crate wraps that object behind the [`HostBridge`] trait so the rest of the
//! app behaves the same inside the host, in a plain browser and in tests.
//!
//! # Example
//!
//! ```rust
//! use host_bridge::{detect, HostBridge};
//!
//! let bridge = detect();
//! bridge.ready();
//! if !bridge.is_available() {
//!     assert_eq!(bridge.platform(), "unknown");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod init_data;
pub mod memory;
pub mod null;
#[cfg(target_arch = "wasm32")]
pub mod telegram;
pub mod types;

use std::sync::Arc;

pub use bridge::HostBridge;
pub use init_data::{InitDataError, InitDataUnsafe, WebAppUser};
pub use memory::{InMemoryBridge, MainButtonState};
pub use null::NullBridge;
#[cfg(target_arch = "wasm32")]
pub use telegram::TelegramBridge;
pub use types::{
    AlertCallback, BridgeEvent, ColorScheme, ConfirmCallback, EventHandler, HandlerId,
    HapticImpactStyle, HapticNotificationType, MainButtonParams, PopupButton, PopupButtonType,
    PopupCallback, PopupParams, ThemeParams,
};

/// Pick the bridge for the current environment
///
/// Returns the Telegram bridge when `window.Telegram.WebApp` exists and the
/// null bridge otherwise (always the null bridge off wasm32).
pub fn detect() -> Arc<dyn HostBridge> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(bridge) = TelegramBridge::detect() {
            tracing::debug!("host bridge detected");
            return Arc::new(bridge);
        }
    }

    tracing::debug!("no host bridge, using null bridge");
    Arc::new(NullBridge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_without_host() {
        let bridge = detect();
        assert!(!bridge.is_available());
        assert_eq!(bridge.color_scheme(), ColorScheme::Light);
    }
}
