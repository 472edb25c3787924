//! Wire types for the backend API
//!
//! Field names follow the backend's snake_case JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Theme Mode
// =============================================================================

/// Visual presentation style of the mini-app
///
/// - `Native`: colors come from the host's theme params
/// - `Premium`: custom premium design colors
/// - `Mixed`: host colors blended with premium design elements
///
/// # Examples
/// ```
/// use api_client::ThemeMode;
///
/// let mode: ThemeMode = "mixed".parse().unwrap();
/// assert_eq!(mode, ThemeMode::Mixed);
/// assert_eq!(ThemeMode::default(), ThemeMode::Premium);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Host theme colors only
    Native,
    /// Premium design colors
    #[default]
    Premium,
    /// Host colors blended with premium elements
    Mixed,
}

impl ThemeMode {
    /// All theme modes in display order
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Native, ThemeMode::Premium, ThemeMode::Mixed];

    /// Identifier used on the wire and in the `data-theme` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Native => "native",
            ThemeMode::Premium => "premium",
            ThemeMode::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three theme modes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode: {0:?}")]
pub struct ParseThemeModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(ThemeMode::Native),
            "premium" => Ok(ThemeMode::Premium),
            "mixed" => Ok(ThemeMode::Mixed),
            other => Err(ParseThemeModeError(other.to_string())),
        }
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// Per-user preferences stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Selected theme mode
    pub theme_mode: ThemeMode,
    /// Reduce animations
    #[serde(default)]
    pub reduced_motion: bool,
}

/// Partial preferences update; absent fields are left out of the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    /// New theme mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<ThemeMode>,
    /// New reduced-motion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
}

impl PreferencesUpdate {
    /// Update that only changes the theme mode
    pub fn theme_mode(mode: ThemeMode) -> Self {
        Self { theme_mode: Some(mode), reduced_motion: None }
    }

    /// Set the reduced-motion flag
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = Some(reduced_motion);
        self
    }

    /// Whether the update carries no changes
    pub fn is_empty(&self) -> bool {
        self.theme_mode.is_none() && self.reduced_motion.is_none()
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Request body for `POST /api/auth/validate`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AuthRequest<'a> {
    #[serde(rename = "initData")]
    pub init_data: &'a str,
}

/// Authenticated user as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Backend user id
    pub id: i64,
    /// Telegram user id
    pub telegram_id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Telegram username
    #[serde(default)]
    pub username: Option<String>,
}

/// Response from `POST /api/auth/validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether validation succeeded
    pub success: bool,
    /// The authenticated user
    pub user: AuthUser,
}

// =============================================================================
// Health
// =============================================================================

/// Response from `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Database connectivity, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Failure reason, when unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    /// Whether the backend reported itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
