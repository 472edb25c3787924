//! Simulated host for headless runs and tests
//!
//! Holds the values a real host would report, records every command it
//! receives and lets the caller fire host events.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::bridge::HostBridge;
use crate::init_data::InitDataUnsafe;
use crate::types::{
    AlertCallback, BridgeEvent, ColorScheme, ConfirmCallback, EventHandler, HandlerId,
    HapticImpactStyle, HapticNotificationType, MainButtonParams, PopupCallback, PopupParams,
    ThemeParams,
};

/// Main button state as last set through the bridge
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MainButtonState {
    /// Label
    pub text: String,
    /// Background color
    pub color: Option<String>,
    /// Label color
    pub text_color: Option<String>,
    /// Accepts presses
    pub is_active: bool,
    /// Shown
    pub is_visible: bool,
}

#[derive(Default)]
struct State {
    theme_params: ThemeParams,
    color_scheme: ColorScheme,
    init_data: String,
    platform: String,
    version: String,
    viewport_height: f64,
    viewport_stable_height: f64,
    expanded: bool,
    ready: bool,
    closed: bool,
    main_button: MainButtonState,
    back_button_visible: bool,
    popup_answer: String,
    confirm_answer: bool,
    calls: Vec<String>,
    handlers: HashMap<BridgeEvent, Vec<(HandlerId, EventHandler)>>,
}

/// In-process host simulation
///
/// # Examples
/// ```
/// use host_bridge::{BridgeEvent, ColorScheme, HostBridge, InMemoryBridge, ThemeParams};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let bridge = InMemoryBridge::new().with_color_scheme(ColorScheme::Dark);
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// bridge.on_theme_changed(Arc::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// bridge.change_theme(ThemeParams::default(), ColorScheme::Light);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// assert_eq!(bridge.color_scheme(), ColorScheme::Light);
/// ```
pub struct InMemoryBridge {
    state: Mutex<State>,
}

impl Default for InMemoryBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBridge {
    /// Create a simulated host with Telegram-like defaults
    pub fn new() -> Self {
        let state = State {
            platform: "tdesktop".to_string(),
            version: "7.0".to_string(),
            viewport_height: 600.0,
            viewport_stable_height: 600.0,
            popup_answer: "ok".to_string(),
            confirm_answer: true,
            main_button: MainButtonState {
                text: "CONTINUE".to_string(),
                is_active: true,
                ..Default::default()
            },
            ..Default::default()
        };
        Self { state: Mutex::new(state) }
    }

    /// Set the reported theme params
    pub fn with_theme_params(self, params: ThemeParams) -> Self {
        self.state.lock().theme_params = params;
        self
    }

    /// Set the reported color scheme
    pub fn with_color_scheme(self, scheme: ColorScheme) -> Self {
        self.state.lock().color_scheme = scheme;
        self
    }

    /// Set the raw init data
    pub fn with_init_data(self, raw: impl Into<String>) -> Self {
        self.state.lock().init_data = raw.into();
        self
    }

    /// Set the reported platform
    pub fn with_platform(self, platform: impl Into<String>) -> Self {
        self.state.lock().platform = platform.into();
        self
    }

    /// Set the button id returned from popups
    pub fn with_popup_answer(self, button_id: impl Into<String>) -> Self {
        self.state.lock().popup_answer = button_id.into();
        self
    }

    /// Set the answer returned from confirmations
    pub fn with_confirm_answer(self, confirmed: bool) -> Self {
        self.state.lock().confirm_answer = confirmed;
        self
    }

    /// Replace the host theme and fire `themeChanged`
    pub fn change_theme(&self, params: ThemeParams, scheme: ColorScheme) {
        {
            let mut state = self.state.lock();
            state.theme_params = params;
            state.color_scheme = scheme;
        }
        self.emit(BridgeEvent::ThemeChanged);
    }

    /// Resize the viewport and fire `viewportChanged`
    pub fn resize(&self, height: f64, stable_height: f64) {
        {
            let mut state = self.state.lock();
            state.viewport_height = height;
            state.viewport_stable_height = stable_height;
        }
        self.emit(BridgeEvent::ViewportChanged);
    }

    /// Fire an event; returns how many handlers ran
    ///
    /// Handlers run without the internal lock held, so they may call back
    /// into the bridge.
    pub fn emit(&self, event: BridgeEvent) -> usize {
        let handlers: Vec<EventHandler> = self
            .state
            .lock()
            .handlers
            .get(&event)
            .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    /// Number of handlers registered for an event
    pub fn handler_count(&self, event: BridgeEvent) -> usize {
        self.state.lock().handlers.get(&event).map_or(0, Vec::len)
    }

    /// Commands received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Whether `ready` was called
    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Current main button state
    pub fn main_button(&self) -> MainButtonState {
        self.state.lock().main_button.clone()
    }

    /// Whether the back button is shown
    pub fn is_back_button_visible(&self) -> bool {
        self.state.lock().back_button_visible
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().calls.push(call.into());
    }
}

impl HostBridge for InMemoryBridge {
    fn is_available(&self) -> bool {
        true
    }

    fn ready(&self) {
        self.record("ready");
        self.state.lock().ready = true;
    }

    fn expand(&self) {
        self.record("expand");
        let mut state = self.state.lock();
        state.expanded = true;
        state.viewport_stable_height = state.viewport_height;
    }

    fn close(&self) {
        self.record("close");
        self.state.lock().closed = true;
    }

    fn show_main_button(&self) {
        self.record("show_main_button");
        self.state.lock().main_button.is_visible = true;
    }

    fn hide_main_button(&self) {
        self.record("hide_main_button");
        self.state.lock().main_button.is_visible = false;
    }

    fn set_main_button_params(&self, params: &MainButtonParams) {
        self.record("set_main_button_params");
        let mut state = self.state.lock();
        let button = &mut state.main_button;
        if let Some(text) = &params.text {
            button.text = text.clone();
        }
        if let Some(color) = &params.color {
            button.color = Some(color.clone());
        }
        if let Some(text_color) = &params.text_color {
            button.text_color = Some(text_color.clone());
        }
        if let Some(is_active) = params.is_active {
            button.is_active = is_active;
        }
        if let Some(is_visible) = params.is_visible {
            button.is_visible = is_visible;
        }
    }

    fn set_main_button_text(&self, text: &str) {
        self.record(format!("set_main_button_text:{text}"));
        self.state.lock().main_button.text = text.to_string();
    }

    fn show_back_button(&self) {
        self.record("show_back_button");
        self.state.lock().back_button_visible = true;
    }

    fn hide_back_button(&self) {
        self.record("hide_back_button");
        self.state.lock().back_button_visible = false;
    }

    fn show_popup(&self, params: &PopupParams, callback: Option<PopupCallback>) {
        self.record(format!("show_popup:{}", params.message));
        let answer = self.state.lock().popup_answer.clone();
        if let Some(callback) = callback {
            callback(answer);
        }
    }

    fn show_alert(&self, message: &str, callback: Option<AlertCallback>) {
        self.record(format!("show_alert:{message}"));
        if let Some(callback) = callback {
            callback();
        }
    }

    fn show_confirm(&self, message: &str, callback: Option<ConfirmCallback>) {
        self.record(format!("show_confirm:{message}"));
        let answer = self.state.lock().confirm_answer;
        if let Some(callback) = callback {
            callback(answer);
        }
    }

    fn theme_params(&self) -> ThemeParams {
        self.state.lock().theme_params.clone()
    }

    fn color_scheme(&self) -> ColorScheme {
        self.state.lock().color_scheme
    }

    fn viewport_height(&self) -> f64 {
        self.state.lock().viewport_height
    }

    fn viewport_stable_height(&self) -> f64 {
        self.state.lock().viewport_stable_height
    }

    fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    fn init_data(&self) -> String {
        self.state.lock().init_data.clone()
    }

    fn init_data_unsafe(&self) -> Option<InitDataUnsafe> {
        let raw = self.init_data();
        if raw.is_empty() {
            return None;
        }
        match InitDataUnsafe::parse(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Failed to parse init data: {}", e);
                None
            }
        }
    }

    fn haptic_impact(&self, style: HapticImpactStyle) {
        self.record(format!("haptic_impact:{}", style.as_str()));
    }

    fn haptic_notification(&self, kind: HapticNotificationType) {
        self.record(format!("haptic_notification:{}", kind.as_str()));
    }

    fn haptic_selection(&self) {
        self.record("haptic_selection");
    }

    fn platform(&self) -> String {
        self.state.lock().platform.clone()
    }

    fn version(&self) -> String {
        self.state.lock().version.clone()
    }

    fn open_link(&self, url: &str, try_instant_view: bool) {
        self.record(format!("open_link:{url}:{try_instant_view}"));
    }

    fn open_telegram_link(&self, url: &str) {
        self.record(format!("open_telegram_link:{url}"));
    }

    fn on_event(&self, event: BridgeEvent, handler: EventHandler) -> HandlerId {
        let id = HandlerId::next();
        self.state.lock().handlers.entry(event).or_default().push((id, handler));
        id
    }

    fn off_event(&self, event: BridgeEvent, id: HandlerId) {
        if let Some(list) = self.state.lock().handlers.get_mut(&event) {
            list.retain(|(existing, _)| *existing != id);
        }
    }
}
