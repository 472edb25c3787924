//! Data exchanged with the host bridge

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// Callbacks
// =============================================================================

/// Handler invoked when a host event fires
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving the id of the pressed popup button
pub type PopupCallback = Box<dyn FnOnce(String) + Send>;

/// Callback invoked when an alert is dismissed
pub type AlertCallback = Box<dyn FnOnce() + Send>;

/// Callback receiving the user's answer to a confirm popup
pub type ConfirmCallback = Box<dyn FnOnce(bool) + Send>;

/// Token identifying a registered event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HandlerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Events the host can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeEvent {
    /// Host theme (color scheme or theme params) changed
    ThemeChanged,
    /// Viewport height changed
    ViewportChanged,
    /// The main button was pressed
    MainButtonClicked,
    /// The back button was pressed
    BackButtonClicked,
}

impl BridgeEvent {
    /// Event name used by the host API
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeEvent::ThemeChanged => "themeChanged",
            BridgeEvent::ViewportChanged => "viewportChanged",
            BridgeEvent::MainButtonClicked => "mainButtonClicked",
            BridgeEvent::BackButtonClicked => "backButtonClicked",
        }
    }
}

impl fmt::Display for BridgeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Host color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light scheme
    #[default]
    Light,
    /// Dark scheme
    Dark,
}

impl ColorScheme {
    /// Scheme name as reported by the host
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Whether this is the dark scheme
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

/// Named color slots provided by the host
///
/// Every slot is optional; a host outside Telegram provides none.
///
/// # Examples
/// ```
/// use host_bridge::ThemeParams;
///
/// let params = ThemeParams {
///     bg_color: Some("#17212b".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(params.get("bg_color"), Some("#17212b"));
/// assert_eq!(params.iter().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeParams {
    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Main text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Hint text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_color: Option<String>,
    /// Link color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
    /// Button color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    /// Button text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    /// Secondary background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_bg_color: Option<String>,
}

impl ThemeParams {
    /// Slot names in a stable order
    pub const SLOTS: [&'static str; 7] = [
        "bg_color",
        "text_color",
        "hint_color",
        "link_color",
        "button_color",
        "button_text_color",
        "secondary_bg_color",
    ];

    /// Look up a slot by name
    pub fn get(&self, slot: &str) -> Option<&str> {
        let value = match slot {
            "bg_color" => &self.bg_color,
            "text_color" => &self.text_color,
            "hint_color" => &self.hint_color,
            "link_color" => &self.link_color,
            "button_color" => &self.button_color,
            "button_text_color" => &self.button_text_color,
            "secondary_bg_color" => &self.secondary_bg_color,
            _ => return None,
        };
        value.as_deref()
    }

    /// Present slots as `(name, color)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Self::SLOTS
            .iter()
            .filter_map(move |slot| self.get(slot).map(|value| (*slot, value)))
    }

    /// Whether no slot is set
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

// =============================================================================
// Buttons and popups
// =============================================================================

/// Parameters for the host main button; unset fields are left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MainButtonParams {
    /// Button label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Whether the button accepts presses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Whether the button is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

/// Style of a popup button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupButtonType {
    /// Plain button with custom text
    #[default]
    Default,
    /// Localized "OK"
    Ok,
    /// Localized "Close"
    Close,
    /// Localized "Cancel"
    Cancel,
    /// Destructive action with custom text
    Destructive,
}

/// A button shown in a popup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopupButton {
    /// Id reported back to the popup callback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Button style
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PopupButtonType>,
    /// Label for `default` and `destructive` buttons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A native popup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopupParams {
    /// Optional title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text
    pub message: String,
    /// Buttons; the host shows a single "Close" button when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<PopupButton>,
}

impl PopupParams {
    /// Popup with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Default::default() }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a button
    pub fn with_button(mut self, button: PopupButton) -> Self {
        self.buttons.push(button);
        self
    }
}

// =============================================================================
// Haptics
// =============================================================================

/// Impact haptic intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticImpactStyle {
    /// Light impact
    Light,
    /// Medium impact
    Medium,
    /// Heavy impact
    Heavy,
    /// Rigid impact
    Rigid,
    /// Soft impact
    Soft,
}

impl HapticImpactStyle {
    /// Style name used by the host API
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticImpactStyle::Light => "light",
            HapticImpactStyle::Medium => "medium",
            HapticImpactStyle::Heavy => "heavy",
            HapticImpactStyle::Rigid => "rigid",
            HapticImpactStyle::Soft => "soft",
        }
    }
}

/// Notification haptic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticNotificationType {
    /// Task failed
    Error,
    /// Task completed
    Success,
    /// Warning
    Warning,
}

impl HapticNotificationType {
    /// Type name used by the host API
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticNotificationType::Error => "error",
            HapticNotificationType::Success => "success",
            HapticNotificationType::Warning => "warning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_ids_are_unique() {
        let a = HandlerId::next();
        let b = HandlerId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_theme_params_from_host_json() {
        let params: ThemeParams = serde_json::from_str(
            r##"{"bg_color":"#ffffff","button_color":"#2481cc","section_bg_color":"#f1f1f1"}"##,
        )
        .unwrap();

        assert_eq!(params.get("bg_color"), Some("#ffffff"));
        assert_eq!(params.get("section_bg_color"), None);
        let slots: Vec<_> = params.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec!["bg_color", "button_color"]);
        assert!(!params.is_empty());
        assert!(ThemeParams::default().is_empty());
    }

    #[test]
    fn test_popup_params_wire_format() {
        let params = PopupParams::message("Delete draft?")
            .with_title("Drafts")
            .with_button(PopupButton {
                id: Some("delete".to_string()),
                kind: Some(PopupButtonType::Destructive),
                text: Some("Delete".to_string()),
            })
            .with_button(PopupButton { kind: Some(PopupButtonType::Cancel), ..Default::default() });

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Drafts",
                "message": "Delete draft?",
                "buttons": [
                    { "id": "delete", "type": "destructive", "text": "Delete" },
                    { "type": "cancel" }
                ]
            })
        );
    }

    #[test]
    fn test_main_button_params_skip_unset() {
        let params = MainButtonParams {
            text: Some("Save".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "text": "Save", "is_active": false })
        );
    }

    #[test]
    fn test_event_and_haptic_names() {
        assert_eq!(BridgeEvent::ThemeChanged.to_string(), "themeChanged");
        assert_eq!(BridgeEvent::BackButtonClicked.as_str(), "backButtonClicked");
        assert_eq!(HapticImpactStyle::Rigid.as_str(), "rigid");
        assert_eq!(HapticNotificationType::Warning.as_str(), "warning");
        assert_eq!(ColorScheme::default(), ColorScheme::Light);
        assert!(ColorScheme::Dark.is_dark());
    }
}
