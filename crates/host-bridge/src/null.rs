//! Bridge used when the app runs outside the host (plain browser, tests, CLI)
//!
//! In a plain browser (wasm32) dialogs fall back to `window.alert` and
//! `window.confirm`.

use crate::bridge::HostBridge;
use crate::init_data::InitDataUnsafe;
use crate::types::{
    AlertCallback, BridgeEvent, ColorScheme, ConfirmCallback, EventHandler, HandlerId,
    HapticImpactStyle, HapticNotificationType, MainButtonParams, PopupCallback, PopupParams,
    ThemeParams,
};

/// Platform name reported without a host
pub const UNKNOWN_PLATFORM: &str = "unknown";

/// Bridge version reported without a host
pub const UNKNOWN_VERSION: &str = "0.0";

/// No-op bridge with safe defaults
///
/// Commands log a warning and do nothing. Queries return defaults: light
/// scheme, no theme params, zero viewport, empty init data. Popups and alerts
/// use the browser's `alert` where there is one and then complete (`"ok"`
/// for popups). Confirmations use the browser's `confirm` and are declined
/// without a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBridge;

impl NullBridge {
    fn unavailable(&self, method: &'static str) {
        tracing::warn!(method, "host bridge not available, call ignored outside the host");
    }
}

/// Text of the browser dialog standing in for a popup
fn popup_text(params: &PopupParams) -> String {
    match &params.title {
        Some(title) => format!("{title}\n\n{}", params.message),
        None => params.message.clone(),
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    pub(super) fn alert(message: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.alert_with_message(message) {
            tracing::warn!(error = ?e, "window.alert failed");
        }
    }

    pub(super) fn confirm(message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod browser {
    pub(super) fn alert(message: &str) {
        tracing::info!(%message, "alert");
    }

    pub(super) fn confirm(message: &str) -> bool {
        tracing::info!(%message, "confirm declined without a browser");
        false
    }
}

impl HostBridge for NullBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn ready(&self) {
        self.unavailable("ready");
    }

    fn expand(&self) {
        self.unavailable("expand");
    }

    fn close(&self) {
        self.unavailable("close");
    }

    fn show_main_button(&self) {
        self.unavailable("show_main_button");
    }

    fn hide_main_button(&self) {
        self.unavailable("hide_main_button");
    }

    fn set_main_button_params(&self, _params: &MainButtonParams) {
        self.unavailable("set_main_button_params");
    }

    fn set_main_button_text(&self, _text: &str) {
        self.unavailable("set_main_button_text");
    }

    fn show_back_button(&self) {
        self.unavailable("show_back_button");
    }

    fn hide_back_button(&self) {
        self.unavailable("hide_back_button");
    }

    fn show_popup(&self, params: &PopupParams, callback: Option<PopupCallback>) {
        self.unavailable("show_popup");
        browser::alert(&popup_text(params));
        if let Some(callback) = callback {
            callback("ok".to_string());
        }
    }

    fn show_alert(&self, message: &str, callback: Option<AlertCallback>) {
        self.unavailable("show_alert");
        browser::alert(message);
        if let Some(callback) = callback {
            callback();
        }
    }

    fn show_confirm(&self, message: &str, callback: Option<ConfirmCallback>) {
        self.unavailable("show_confirm");
        let confirmed = browser::confirm(message);
        if let Some(callback) = callback {
            callback(confirmed);
        }
    }

    fn theme_params(&self) -> ThemeParams {
        ThemeParams::default()
    }

    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn viewport_height(&self) -> f64 {
        0.0
    }

    fn viewport_stable_height(&self) -> f64 {
        0.0
    }

    fn is_expanded(&self) -> bool {
        false
    }

    fn init_data(&self) -> String {
        self.unavailable("init_data");
        String::new()
    }

    fn init_data_unsafe(&self) -> Option<InitDataUnsafe> {
        self.unavailable("init_data_unsafe");
        None
    }

    fn haptic_impact(&self, _style: HapticImpactStyle) {
        self.unavailable("haptic_impact");
    }

    fn haptic_notification(&self, _kind: HapticNotificationType) {
        self.unavailable("haptic_notification");
    }

    fn haptic_selection(&self) {
        self.unavailable("haptic_selection");
    }

    fn platform(&self) -> String {
        UNKNOWN_PLATFORM.to_string()
    }

    fn version(&self) -> String {
        UNKNOWN_VERSION.to_string()
    }

    fn open_link(&self, url: &str, _try_instant_view: bool) {
        self.unavailable("open_link");
        tracing::info!(%url, "external link requested");
    }

    fn open_telegram_link(&self, url: &str) {
        self.unavailable("open_telegram_link");
        tracing::info!(%url, "telegram link requested");
    }

    fn on_event(&self, event: BridgeEvent, _handler: EventHandler) -> HandlerId {
        self.unavailable(match event {
            BridgeEvent::ThemeChanged => "on_theme_changed",
            BridgeEvent::ViewportChanged => "on_viewport_changed",
            BridgeEvent::MainButtonClicked => "on_main_button_click",
            BridgeEvent::BackButtonClicked => "on_back_button_click",
        });
        HandlerId::next()
    }

    fn off_event(&self, event: BridgeEvent, _id: HandlerId) {
        self.unavailable(match event {
            BridgeEvent::ThemeChanged => "off_theme_changed",
            BridgeEvent::ViewportChanged => "off_viewport_changed",
            BridgeEvent::MainButtonClicked => "off_main_button_click",
            BridgeEvent::BackButtonClicked => "off_back_button_click",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_defaults() {
        let bridge = NullBridge;
        assert!(!bridge.is_available());
        assert_eq!(bridge.color_scheme(), ColorScheme::Light);
        assert!(bridge.theme_params().is_empty());
        assert_eq!(bridge.viewport_height(), 0.0);
        assert_eq!(bridge.viewport_stable_height(), 0.0);
        assert!(!bridge.is_expanded());
        assert_eq!(bridge.init_data(), "");
        assert!(bridge.init_data_unsafe().is_none());
        assert!(bridge.user_unsafe().is_none());
        assert_eq!(bridge.platform(), "unknown");
        assert_eq!(bridge.version(), "0.0");
    }

    #[test]
    fn test_commands_are_noops() {
        let bridge = NullBridge;
        bridge.ready();
        bridge.expand();
        bridge.show_main_button();
        bridge.set_main_button_text("Save");
        bridge.haptic_impact(HapticImpactStyle::Heavy);
        bridge.open_link("https://example.com", false);
        bridge.close();
    }

    #[test]
    fn test_popup_and_alert_callbacks_complete() {
        let bridge = NullBridge;

        let pressed = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&pressed);
        bridge.show_popup(
            &PopupParams::message("Saved"),
            Some(Box::new(move |id| *slot.lock().unwrap() = Some(id))),
        );
        assert_eq!(pressed.lock().unwrap().as_deref(), Some("ok"));

        let dismissed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dismissed);
        bridge.show_alert("Done", Some(Box::new(move || flag.store(true, Ordering::SeqCst))));
        assert!(dismissed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_confirm_is_declined() {
        let answer = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&answer);
        NullBridge.show_confirm("Delete?", Some(Box::new(move |ok| *slot.lock().unwrap() = Some(ok))));
        assert_eq!(*answer.lock().unwrap(), Some(false));
    }

    #[test]
    fn test_popup_text_puts_title_first() {
        assert_eq!(popup_text(&PopupParams::message("Saved")), "Saved");
        assert_eq!(
            popup_text(&PopupParams::message("Theme saved").with_title("Settings")),
            "Settings\n\nTheme saved"
        );
    }

    #[test]
    fn test_subscriptions_never_fire() {
        let bridge = NullBridge;
        let id = bridge.on_theme_changed(Arc::new(|| panic!("no host, no events")));
        bridge.off_theme_changed(id);
    }
}
