//! Presentation layer port
//!
//! Styling is driven by one root attribute (`data-theme`) plus CSS custom
//! properties carrying host colors. The theme manager is the only writer.

use api_client::ThemeMode;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

/// Root attribute holding the theme mode
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Errors raised while writing to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// No document root to write to
    #[error("presentation root unavailable")]
    Unavailable,

    /// The write itself was rejected
    #[error("failed to write {target}: {reason}")]
    Write {
        /// Attribute or property name
        target: String,
        /// Reason reported by the platform
        reason: String,
    },
}

/// Sink for theme state
pub trait Presentation: Send + Sync {
    /// Set the root theme attribute
    fn apply_theme_mode(&self, mode: ThemeMode) -> Result<(), PresentationError>;

    /// Set a CSS custom property on the root element
    fn set_color_variable(&self, name: &str, value: &str) -> Result<(), PresentationError>;
}

#[derive(Debug, Default)]
struct Recorded {
    theme_mode: Option<ThemeMode>,
    variables: BTreeMap<String, String>,
    theme_writes: Vec<ThemeMode>,
    failing_modes: HashSet<ThemeMode>,
    unavailable: bool,
}

/// Headless presentation layer that records writes
///
/// Writes can be made to fail per mode, which is how the critical-failure
/// path of the theme manager is exercised.
#[derive(Debug, Default)]
pub struct MemoryPresentation {
    inner: Mutex<Recorded>,
}

impl MemoryPresentation {
    /// Create an empty presentation layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes of `mode` fail
    pub fn fail_on(&self, mode: ThemeMode) {
        self.inner.lock().failing_modes.insert(mode);
    }

    /// Make every write fail as if no document existed
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    /// Clear injected failures
    pub fn heal(&self) {
        let mut inner = self.inner.lock();
        inner.failing_modes.clear();
        inner.unavailable = false;
    }

    /// Current theme attribute value
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.inner.lock().theme_mode
    }

    /// Successful theme attribute writes, in order
    pub fn theme_writes(&self) -> Vec<ThemeMode> {
        self.inner.lock().theme_writes.clone()
    }

    /// Value of a CSS custom property
    pub fn variable(&self, name: &str) -> Option<String> {
        self.inner.lock().variables.get(name).cloned()
    }

    /// All CSS custom properties
    pub fn variables(&self) -> BTreeMap<String, String> {
        self.inner.lock().variables.clone()
    }
}

impl Presentation for MemoryPresentation {
    fn apply_theme_mode(&self, mode: ThemeMode) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        if inner.unavailable {
            return Err(PresentationError::Unavailable);
        }
        if inner.failing_modes.contains(&mode) {
            return Err(PresentationError::Write {
                target: THEME_ATTRIBUTE.to_string(),
                reason: format!("rejected {mode}"),
            });
        }
        inner.theme_mode = Some(mode);
        inner.theme_writes.push(mode);
        Ok(())
    }

    fn set_color_variable(&self, name: &str, value: &str) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        if inner.unavailable {
            return Err(PresentationError::Unavailable);
        }
        inner.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Presentation layer backed by `document.documentElement` (wasm32 only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DomPresentation;

#[cfg(target_arch = "wasm32")]
impl DomPresentation {
    fn root() -> Result<web_sys::Element, PresentationError> {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .ok_or(PresentationError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Presentation for DomPresentation {
    fn apply_theme_mode(&self, mode: ThemeMode) -> Result<(), PresentationError> {
        Self::root()?
            .set_attribute(THEME_ATTRIBUTE, mode.as_str())
            .map_err(|e| PresentationError::Write {
                target: THEME_ATTRIBUTE.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn set_color_variable(&self, name: &str, value: &str) -> Result<(), PresentationError> {
        use wasm_bindgen::JsCast;

        let root: web_sys::HtmlElement =
            Self::root()?.dyn_into().map_err(|_| PresentationError::Unavailable)?;
        root.style()
            .set_property(name, value)
            .map_err(|e| PresentationError::Write { target: name.to_string(), reason: format!("{e:?}") })
    }
}
