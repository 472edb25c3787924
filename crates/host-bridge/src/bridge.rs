//! The host bridge capability interface
//!
//! Mirrors the surface of the host's `WebApp` object. Implementations exist
//! for a real host ([`crate::TelegramBridge`], wasm only), for no host at all
//! ([`crate::NullBridge`]) and for a simulated host ([`crate::InMemoryBridge`]).
//! Callers never check for host presence themselves.

use crate::init_data::{InitDataUnsafe, WebAppUser};
use crate::types::{
    AlertCallback, BridgeEvent, ColorScheme, ConfirmCallback, EventHandler, HandlerId,
    HapticImpactStyle, HapticNotificationType, MainButtonParams, PopupCallback, PopupParams,
    ThemeParams,
};

/// Host bridge operations
pub trait HostBridge: Send + Sync {
    /// Whether a real host object backs this bridge
    fn is_available(&self) -> bool;

    // Lifecycle

    /// Tell the host the app is ready to be shown
    fn ready(&self);

    /// Expand the app to full height
    fn expand(&self);

    /// Close the app
    fn close(&self);

    // Main button

    /// Show the main button
    fn show_main_button(&self);

    /// Hide the main button
    fn hide_main_button(&self);

    /// Update main button parameters
    fn set_main_button_params(&self, params: &MainButtonParams);

    /// Set the main button label
    fn set_main_button_text(&self, text: &str);

    // Back button

    /// Show the back button
    fn show_back_button(&self);

    /// Hide the back button
    fn hide_back_button(&self);

    // Popups

    /// Show a popup; the callback receives the pressed button id
    fn show_popup(&self, params: &PopupParams, callback: Option<PopupCallback>);

    /// Show an alert
    fn show_alert(&self, message: &str, callback: Option<AlertCallback>);

    /// Show a confirmation dialog
    fn show_confirm(&self, message: &str, callback: Option<ConfirmCallback>);

    // Theme

    /// Host color slots; empty without a host
    fn theme_params(&self) -> ThemeParams;

    /// Host color scheme; light without a host
    fn color_scheme(&self) -> ColorScheme;

    // Viewport

    /// Current visible height in pixels
    fn viewport_height(&self) -> f64;

    /// Height excluding transient UI such as the keyboard
    fn viewport_stable_height(&self) -> f64;

    /// Whether the app occupies full height
    fn is_expanded(&self) -> bool;

    // Init data

    /// Raw signed init data to hand to the backend
    fn init_data(&self) -> String;

    /// Parsed init data; untrusted
    fn init_data_unsafe(&self) -> Option<InitDataUnsafe>;

    /// Launching user from init data; untrusted, display only
    fn user_unsafe(&self) -> Option<WebAppUser> {
        self.init_data_unsafe().and_then(|data| data.user)
    }

    // Haptics

    /// Impact feedback
    fn haptic_impact(&self, style: HapticImpactStyle);

    /// Notification feedback
    fn haptic_notification(&self, kind: HapticNotificationType);

    /// Selection-changed feedback
    fn haptic_selection(&self);

    // Utility

    /// Host platform name
    fn platform(&self) -> String;

    /// Host bridge API version
    fn version(&self) -> String;

    /// Open a link in the external browser
    fn open_link(&self, url: &str, try_instant_view: bool);

    /// Open a `t.me` link inside the host
    fn open_telegram_link(&self, url: &str);

    // Events

    /// Subscribe to a host event
    fn on_event(&self, event: BridgeEvent, handler: EventHandler) -> HandlerId;

    /// Remove a subscription; unknown ids are ignored
    fn off_event(&self, event: BridgeEvent, id: HandlerId);

    /// Subscribe to host theme changes
    fn on_theme_changed(&self, handler: EventHandler) -> HandlerId {
        self.on_event(BridgeEvent::ThemeChanged, handler)
    }

    /// Remove a theme-change subscription
    fn off_theme_changed(&self, id: HandlerId) {
        self.off_event(BridgeEvent::ThemeChanged, id)
    }

    /// Subscribe to viewport changes
    fn on_viewport_changed(&self, handler: EventHandler) -> HandlerId {
        self.on_event(BridgeEvent::ViewportChanged, handler)
    }

    /// Remove a viewport subscription
    fn off_viewport_changed(&self, id: HandlerId) {
        self.off_event(BridgeEvent::ViewportChanged, id)
    }

    /// Subscribe to main button presses
    fn on_main_button_click(&self, handler: EventHandler) -> HandlerId {
        self.on_event(BridgeEvent::MainButtonClicked, handler)
    }

    /// Remove a main button subscription
    fn off_main_button_click(&self, id: HandlerId) {
        self.off_event(BridgeEvent::MainButtonClicked, id)
    }

    /// Subscribe to back button presses
    fn on_back_button_click(&self, handler: EventHandler) -> HandlerId {
        self.on_event(BridgeEvent::BackButtonClicked, handler)
    }

    /// Remove a back button subscription
    fn off_back_button_click(&self, id: HandlerId) {
        self.off_event(BridgeEvent::BackButtonClicked, id)
    }
}
