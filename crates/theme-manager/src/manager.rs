//! Theme state machine
//!
//! The manager owns the active [`ThemeMode`] and is the only writer of the
//! presentation theme attribute. Remote persistence is best effort: a
//! failure there never changes what the user sees.

use api_client::{PreferencesUpdate, ThemeMode};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::presentation::Presentation;
use crate::preferences::PreferencesService;

/// Mode used before anything is loaded and after any failure
pub const DEFAULT_THEME_MODE: ThemeMode = ThemeMode::Premium;

/// Lifecycle of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePhase {
    /// Created, no mode applied yet
    #[default]
    Unloaded,
    /// A mode has been applied by `init` or `set`
    Loaded,
}

#[derive(Debug, Default)]
struct ThemeState {
    mode: ThemeMode,
    phase: ThemePhase,
    // Last mode the presentation layer accepted
    applied: Option<ThemeMode>,
}

/// Owner of the active theme mode
///
/// One instance per app. Tests build their own with mock collaborators.
pub struct ThemeManager {
    state: RwLock<ThemeState>,
    preferences: Arc<dyn PreferencesService>,
    presentation: Arc<dyn Presentation>,
}

impl ThemeManager {
    /// Create a manager in the `Unloaded` phase with mode `premium`
    pub fn new(
        preferences: Arc<dyn PreferencesService>,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        Self {
            state: RwLock::new(ThemeState {
                mode: DEFAULT_THEME_MODE,
                phase: ThemePhase::Unloaded,
                applied: None,
            }),
            preferences,
            presentation,
        }
    }

    /// Mode currently in memory
    pub fn current_mode(&self) -> ThemeMode {
        self.state.read().mode
    }

    /// Lifecycle phase
    pub fn phase(&self) -> ThemePhase {
        self.state.read().phase
    }

    /// Mode the presentation layer last accepted, if any
    pub fn applied_mode(&self) -> Option<ThemeMode> {
        self.state.read().applied
    }

    /// Whether memory and the presentation attribute agree
    ///
    /// Only false after the presentation layer rejected both the requested
    /// mode and the `premium` fallback; the attribute then keeps its
    /// previous value.
    pub fn is_consistent(&self) -> bool {
        let state = self.state.read();
        state.applied == Some(state.mode)
    }

    /// Fetch the stored mode, falling back to `premium` on any failure
    ///
    /// Does not touch in-memory state or the presentation layer.
    pub async fn load(&self) -> ThemeMode {
        match self.preferences.get_preferences().await {
            Ok(prefs) => prefs.theme_mode,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load theme preferences, using {}", DEFAULT_THEME_MODE);
                DEFAULT_THEME_MODE
            }
        }
    }

    /// Switch to `mode`, apply it, then persist it
    ///
    /// If the presentation write fails both memory and presentation drop back
    /// to `premium` and nothing is persisted. A persistence failure is only
    /// logged.
    pub async fn set(&self, mode: ThemeMode) {
        if self.apply_locally(mode) {
            self.persist(mode).await;
        }
    }

    /// Load the stored mode and make it active
    pub async fn init(&self) {
        let mode = self.load().await;
        self.apply_locally(mode);
    }

    /// Like [`set`](Self::set) but persistence runs as a detached task
    ///
    /// Memory and presentation are updated before this returns. Without a
    /// tokio runtime the persistence step is skipped with a warning.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_set(self: &Arc<Self>, mode: ThemeMode) -> Option<tokio::task::JoinHandle<()>> {
        if !self.apply_locally(mode) {
            return None;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let manager = Arc::clone(self);
                Some(handle.spawn(async move { manager.persist(mode).await }))
            }
            Err(e) => {
                tracing::warn!(error = %e, "No runtime for theme persistence, {} kept locally only", mode);
                None
            }
        }
    }

    /// Like [`set`](Self::set) but persistence runs on the browser task queue
    #[cfg(target_arch = "wasm32")]
    pub fn spawn_set(self: &Arc<Self>, mode: ThemeMode) {
        if !self.apply_locally(mode) {
            return;
        }
        let manager = Arc::clone(self);
        wasm_bindgen_futures::spawn_local(async move { manager.persist(mode).await });
    }

    /// Steps 1 and 2 of a switch. Returns false when the fallback was taken.
    ///
    /// The write guard spans the presentation writes so concurrent switches
    /// cannot leave memory and the attribute on different modes. The
    /// presentation layer must not call back into the manager.
    fn apply_locally(&self, mode: ThemeMode) -> bool {
        let mut state = self.state.write();
        state.mode = mode;
        state.phase = ThemePhase::Loaded;

        match self.presentation.apply_theme_mode(mode) {
            Ok(()) => {
                state.applied = Some(mode);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to apply theme {}, falling back to {}", mode, DEFAULT_THEME_MODE);
                state.mode = DEFAULT_THEME_MODE;
                match self.presentation.apply_theme_mode(DEFAULT_THEME_MODE) {
                    Ok(()) => state.applied = Some(DEFAULT_THEME_MODE),
                    Err(e) => tracing::error!(
                        error = %e,
                        applied = ?state.applied,
                        "Failed to apply fallback theme, presentation out of sync"
                    ),
                }
                false
            }
        }
    }

    async fn persist(&self, mode: ThemeMode) {
        if let Err(e) = self.preferences.update_preferences(PreferencesUpdate::theme_mode(mode)).await {
            tracing::warn!(error = %e, "Failed to save theme preference {}", mode);
        }
    }
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ThemeManager")
            .field("mode", &state.mode)
            .field("phase", &state.phase)
            .field("applied", &state.applied)
            .finish_non_exhaustive()
    }
}
