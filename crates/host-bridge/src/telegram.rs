//! Bridge over `window.Telegram.WebApp` (wasm32 only)
//!
//! The WebApp object is looked up on every call, so a bridge created before
//! the host script finished loading still works once it has. When the object
//! is missing the call falls through to [`NullBridge`].

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::bridge::HostBridge;
use crate::init_data::InitDataUnsafe;
use crate::null::NullBridge;
use crate::types::{
    AlertCallback, BridgeEvent, ColorScheme, ConfirmCallback, EventHandler, HandlerId,
    HapticImpactStyle, HapticNotificationType, MainButtonParams, PopupCallback, PopupParams,
    ThemeParams,
};

thread_local! {
    // JS needs the same function object for offEvent, so closures live here
    // until unsubscribed.
    static LISTENERS: RefCell<HashMap<HandlerId, Closure<dyn Fn()>>> = RefCell::new(HashMap::new());
}

/// Bridge to the Telegram Mini Apps host object
#[derive(Debug, Clone, Copy, Default)]
pub struct TelegramBridge {
    fallback: NullBridge,
}

impl TelegramBridge {
    /// Bridge if the host object is present right now
    pub fn detect() -> Option<Self> {
        web_app().map(|_| Self::default())
    }
}

fn web_app() -> Option<JsValue> {
    let telegram = get(&js_sys::global(), "Telegram")?;
    get(&telegram, "WebApp")
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    function.apply(target, &array)
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}

impl TelegramBridge {
    /// Invoke `WebApp.<path...>.<method>(args)`; false when the host is gone
    fn invoke(&self, path: &[&str], method: &str, args: &[JsValue]) -> bool {
        let Some(mut target) = web_app() else {
            return false;
        };
        for segment in path {
            match get(&target, segment) {
                Some(next) => target = next,
                None => return false,
            }
        }
        if let Err(e) = call(&target, method, args) {
            tracing::warn!(method, error = ?e, "host bridge call failed");
        }
        true
    }

    fn read(&self, key: &str) -> Option<JsValue> {
        web_app().and_then(|app| get(&app, key))
    }
}

impl HostBridge for TelegramBridge {
    fn is_available(&self) -> bool {
        web_app().is_some()
    }

    fn ready(&self) {
        if !self.invoke(&[], "ready", &[]) {
            self.fallback.ready();
        }
    }

    fn expand(&self) {
        if !self.invoke(&[], "expand", &[]) {
            self.fallback.expand();
        }
    }

    fn close(&self) {
        if !self.invoke(&[], "close", &[]) {
            self.fallback.close();
        }
    }

    fn show_main_button(&self) {
        if !self.invoke(&["MainButton"], "show", &[]) {
            self.fallback.show_main_button();
        }
    }

    fn hide_main_button(&self) {
        if !self.invoke(&["MainButton"], "hide", &[]) {
            self.fallback.hide_main_button();
        }
    }

    fn set_main_button_params(&self, params: &MainButtonParams) {
        if !self.invoke(&["MainButton"], "setParams", &[to_js(params)]) {
            self.fallback.set_main_button_params(params);
        }
    }

    fn set_main_button_text(&self, text: &str) {
        if !self.invoke(&["MainButton"], "setText", &[JsValue::from_str(text)]) {
            self.fallback.set_main_button_text(text);
        }
    }

    fn show_back_button(&self) {
        if !self.invoke(&["BackButton"], "show", &[]) {
            self.fallback.show_back_button();
        }
    }

    fn hide_back_button(&self) {
        if !self.invoke(&["BackButton"], "hide", &[]) {
            self.fallback.hide_back_button();
        }
    }

    fn show_popup(&self, params: &PopupParams, callback: Option<PopupCallback>) {
        if web_app().is_none() {
            return self.fallback.show_popup(params, callback);
        }
        let js_callback = match callback {
            Some(callback) => Closure::once_into_js(move |id: JsValue| {
                callback(id.as_string().unwrap_or_default())
            }),
            None => JsValue::UNDEFINED,
        };
        self.invoke(&[], "showPopup", &[to_js(params), js_callback]);
    }

    fn show_alert(&self, message: &str, callback: Option<AlertCallback>) {
        if web_app().is_none() {
            return self.fallback.show_alert(message, callback);
        }
        let js_callback = match callback {
            Some(callback) => Closure::once_into_js(move || callback()),
            None => JsValue::UNDEFINED,
        };
        self.invoke(&[], "showAlert", &[JsValue::from_str(message), js_callback]);
    }

    fn show_confirm(&self, message: &str, callback: Option<ConfirmCallback>) {
        if web_app().is_none() {
            return self.fallback.show_confirm(message, callback);
        }
        let js_callback = match callback {
            Some(callback) => Closure::once_into_js(move |confirmed: JsValue| {
                callback(confirmed.as_bool().unwrap_or(false))
            }),
            None => JsValue::UNDEFINED,
        };
        self.invoke(&[], "showConfirm", &[JsValue::from_str(message), js_callback]);
    }

    fn theme_params(&self) -> ThemeParams {
        self.read("themeParams")
            .and_then(|value| serde_wasm_bindgen::from_value(value).ok())
            .unwrap_or_default()
    }

    fn color_scheme(&self) -> ColorScheme {
        match self.read("colorScheme").and_then(|v| v.as_string()).as_deref() {
            Some("dark") => ColorScheme::Dark,
            _ => ColorScheme::Light,
        }
    }

    fn viewport_height(&self) -> f64 {
        self.read("viewportHeight").and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    fn viewport_stable_height(&self) -> f64 {
        self.read("viewportStableHeight").and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    fn is_expanded(&self) -> bool {
        self.read("isExpanded").and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn init_data(&self) -> String {
        if web_app().is_none() {
            return self.fallback.init_data();
        }
        self.read("initData").and_then(|v| v.as_string()).unwrap_or_default()
    }

    fn init_data_unsafe(&self) -> Option<InitDataUnsafe> {
        if web_app().is_none() {
            return self.fallback.init_data_unsafe();
        }
        let raw = self.init_data();
        if raw.is_empty() {
            return None;
        }
        InitDataUnsafe::parse(&raw)
            .map_err(|e| tracing::warn!("Failed to parse init data: {}", e))
            .ok()
    }

    fn haptic_impact(&self, style: HapticImpactStyle) {
        let arg = JsValue::from_str(style.as_str());
        if !self.invoke(&["HapticFeedback"], "impactOccurred", &[arg]) {
            self.fallback.haptic_impact(style);
        }
    }

    fn haptic_notification(&self, kind: HapticNotificationType) {
        let arg = JsValue::from_str(kind.as_str());
        if !self.invoke(&["HapticFeedback"], "notificationOccurred", &[arg]) {
            self.fallback.haptic_notification(kind);
        }
    }

    fn haptic_selection(&self) {
        if !self.invoke(&["HapticFeedback"], "selectionChanged", &[]) {
            self.fallback.haptic_selection();
        }
    }

    fn platform(&self) -> String {
        self.read("platform")
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| self.fallback.platform())
    }

    fn version(&self) -> String {
        self.read("version")
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| self.fallback.version())
    }

    fn open_link(&self, url: &str, try_instant_view: bool) {
        let options = js_sys::Object::new();
        // Setting a plain data property on a fresh object cannot fail.
        let _ = Reflect::set(&options, &"try_instant_view".into(), &JsValue::from_bool(try_instant_view));
        if !self.invoke(&[], "openLink", &[JsValue::from_str(url), options.into()]) {
            self.fallback.open_link(url, try_instant_view);
        }
    }

    fn open_telegram_link(&self, url: &str) {
        if !self.invoke(&[], "openTelegramLink", &[JsValue::from_str(url)]) {
            self.fallback.open_telegram_link(url);
        }
    }

    fn on_event(&self, event: BridgeEvent, handler: EventHandler) -> HandlerId {
        let id = HandlerId::next();
        let closure = Closure::<dyn Fn()>::new(move || handler());
        let function: JsValue = closure.as_ref().clone();

        if self.invoke(&[], "onEvent", &[JsValue::from_str(event.as_str()), function]) {
            LISTENERS.with(|listeners| listeners.borrow_mut().insert(id, closure));
        } else {
            self.fallback.on_event(event, std::sync::Arc::new(|| {}));
        }
        id
    }

    fn off_event(&self, event: BridgeEvent, id: HandlerId) {
        let Some(closure) = LISTENERS.with(|listeners| listeners.borrow_mut().remove(&id)) else {
            return;
        };
        let function: JsValue = closure.as_ref().clone();
        if !self.invoke(&[], "offEvent", &[JsValue::from_str(event.as_str()), function]) {
            self.fallback.off_event(event, id);
        }
    }
}
