//! Host color sync
//!
//! Telegram theme params become CSS custom properties named
//! `--tg-<slot-with-dashes>` (`bg_color` -> `--tg-bg-color`).

use host_bridge::{BridgeEvent, EventHandler, HandlerId, HostBridge};
use std::sync::{Arc, Weak};

use crate::presentation::Presentation;

const VARIABLE_PREFIX: &str = "--tg-";

/// CSS custom property name for a theme param slot
pub fn css_variable_name(slot: &str) -> String {
    format!("{VARIABLE_PREFIX}{}", slot.replace('_', "-"))
}

/// Write every present host theme param; returns how many were written
///
/// An absent host reports no params, so nothing is written.
pub fn apply_host_theme(bridge: &dyn HostBridge, presentation: &dyn Presentation) -> usize {
    let params = bridge.theme_params();
    let mut written = 0;
    for (slot, value) in params.iter() {
        let name = css_variable_name(slot);
        match presentation.set_color_variable(&name, value) {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!(variable = %name, error = %e, "Failed to apply host color"),
        }
    }
    tracing::debug!(written, scheme = %bridge.color_scheme().as_str(), "Applied host theme");
    written
}

/// Keeps host colors applied while attached
///
/// Unsubscribes from the host on [`detach`](Self::detach) or drop.
pub struct HostThemeSync {
    bridge: Arc<dyn HostBridge>,
    handler: Option<HandlerId>,
}

impl HostThemeSync {
    /// Apply host colors now and on every `themeChanged` event
    pub fn attach(bridge: Arc<dyn HostBridge>, presentation: Arc<dyn Presentation>) -> Self {
        apply_host_theme(bridge.as_ref(), presentation.as_ref());

        let weak: Weak<dyn HostBridge> = Arc::downgrade(&bridge);
        let handler: EventHandler = Arc::new(move || {
            if let Some(bridge) = weak.upgrade() {
                apply_host_theme(bridge.as_ref(), presentation.as_ref());
            }
        });
        let id = bridge.on_event(BridgeEvent::ThemeChanged, handler);

        Self { bridge, handler: Some(id) }
    }

    /// Whether the `themeChanged` subscription is live
    pub fn is_attached(&self) -> bool {
        self.handler.is_some()
    }

    /// Stop following host theme changes
    pub fn detach(&mut self) {
        if let Some(id) = self.handler.take() {
            self.bridge.off_event(BridgeEvent::ThemeChanged, id);
        }
    }
}

impl Drop for HostThemeSync {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for HostThemeSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostThemeSync").field("handler", &self.handler).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::MemoryPresentation;
    use host_bridge::{ColorScheme, InMemoryBridge, NullBridge, ThemeParams};

    fn dark_params() -> ThemeParams {
        ThemeParams {
            bg_color: Some("#17212b".to_string()),
            text_color: Some("#f5f5f5".to_string()),
            button_color: Some("#5288c1".to_string()),
            ..ThemeParams::default()
        }
    }

    #[test]
    fn test_css_variable_name() {
        assert_eq!(css_variable_name("bg_color"), "--tg-bg-color");
        assert_eq!(css_variable_name("secondary_bg_color"), "--tg-secondary-bg-color");
    }

    #[test]
    fn test_apply_skips_absent_slots() {
        let bridge = InMemoryBridge::new().with_theme_params(dark_params());
        let presentation = MemoryPresentation::new();

        assert_eq!(apply_host_theme(&bridge, &presentation), 3);
        assert_eq!(presentation.variable("--tg-bg-color").as_deref(), Some("#17212b"));
        assert_eq!(presentation.variable("--tg-button-color").as_deref(), Some("#5288c1"));
        assert_eq!(presentation.variable("--tg-hint-color"), None);
        assert_eq!(presentation.variables().len(), 3);
    }

    #[test]
    fn test_absent_host_writes_nothing() {
        let presentation = MemoryPresentation::new();
        assert_eq!(apply_host_theme(&NullBridge, &presentation), 0);
        assert!(presentation.variables().is_empty());
    }

    #[test]
    fn test_follows_theme_changes_until_detached() {
        let bridge = Arc::new(InMemoryBridge::new());
        let presentation = Arc::new(MemoryPresentation::new());

        let mut sync = HostThemeSync::attach(bridge.clone(), presentation.clone());
        assert!(sync.is_attached());
        assert!(presentation.variables().is_empty());
        assert_eq!(bridge.handler_count(BridgeEvent::ThemeChanged), 1);

        bridge.change_theme(dark_params(), ColorScheme::Dark);
        assert_eq!(presentation.variable("--tg-text-color").as_deref(), Some("#f5f5f5"));

        sync.detach();
        assert!(!sync.is_attached());
        assert_eq!(bridge.handler_count(BridgeEvent::ThemeChanged), 0);

        let light = ThemeParams { text_color: Some("#000000".to_string()), ..ThemeParams::default() };
        bridge.change_theme(light, ColorScheme::Light);
        assert_eq!(presentation.variable("--tg-text-color").as_deref(), Some("#f5f5f5"));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bridge = Arc::new(InMemoryBridge::new());
        let presentation = Arc::new(MemoryPresentation::new());

        {
            let _sync = HostThemeSync::attach(bridge.clone(), presentation);
            assert_eq!(bridge.handler_count(BridgeEvent::ThemeChanged), 1);
        }
        assert_eq!(bridge.handler_count(BridgeEvent::ThemeChanged), 0);
    }
}
