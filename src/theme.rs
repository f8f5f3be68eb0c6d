//! Platform theme: timing and gesture thresholds injected into editors
//!
//! A theme is a plain value handed to each [`LineEditor`](crate::interaction::LineEditor).
//! [`PlatformTheme::global`] caches one default instance for callers that
//! have nothing better to inject; it is initialized on first use and never
//! mutated afterwards.

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Keyboard conventions that change a few navigation defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardScheme {
    /// Home/End go to line bounds, Ctrl+arrows move by word
    #[default]
    Windows,
    /// Cmd+arrows go to line/document bounds, Alt+arrows move by word
    Mac,
    /// Like Windows without Ctrl+Y redo, with an X11 primary selection
    X11,
}

impl KeyboardScheme {
    /// Scheme matching the compile target
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            KeyboardScheme::Mac
        } else if cfg!(target_os = "windows") {
            KeyboardScheme::Windows
        } else {
            KeyboardScheme::X11
        }
    }

    /// Whether the platform exposes a primary (select-to-copy) clipboard
    pub fn has_selection_clipboard(self) -> bool {
        self == KeyboardScheme::X11
    }
}

/// Timing and threshold values supplied by the host platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTheme {
    /// Full on/off cursor flash cycle in milliseconds; 0 disables blinking
    pub cursor_flash_time_ms: u64,
    /// Pointer travel (manhattan distance) before a press becomes a drag
    pub start_drag_distance: f32,
    /// Maximum delay between clicks of a double click, in milliseconds
    pub double_click_interval_ms: u64,
    pub keyboard_scheme: KeyboardScheme,
    pub supports_selection_clipboard: bool,
    pub cursor_blinking: bool,
}

impl Default for PlatformTheme {
    fn default() -> Self {
        let keyboard_scheme = KeyboardScheme::native();
        Self {
            cursor_flash_time_ms: 1000,
            start_drag_distance: 10.0,
            double_click_interval_ms: 400,
            keyboard_scheme,
            supports_selection_clipboard: keyboard_scheme.has_selection_clipboard(),
            cursor_blinking: true,
        }
    }
}

static DEFAULT_THEME: OnceLock<PlatformTheme> = OnceLock::new();

impl PlatformTheme {
    /// Shared default theme
    pub fn global() -> &'static PlatformTheme {
        DEFAULT_THEME.get_or_init(|| {
            let theme = PlatformTheme::default();
            tracing::debug!(scheme = ?theme.keyboard_scheme, "Initialized default platform theme");
            theme
        })
    }

    /// Theme with the given keyboard scheme and matching clipboard support
    pub fn with_scheme(scheme: KeyboardScheme) -> Self {
        Self {
            keyboard_scheme: scheme,
            supports_selection_clipboard: scheme.has_selection_clipboard(),
            ..Self::default()
        }
    }

    pub fn cursor_flash_time(&self) -> Duration {
        Duration::from_millis(self.cursor_flash_time_ms)
    }

    /// Half the flash cycle, or `None` when blinking is off
    pub fn blink_interval(&self) -> Option<Duration> {
        (self.cursor_blinking && self.cursor_flash_time_ms > 0)
            .then(|| Duration::from_millis(self.cursor_flash_time_ms / 2))
    }

    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_interval_ms)
    }

    /// Parse a theme from YAML; missing fields take their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_interval_is_half_flash_time() {
        let theme = PlatformTheme {
            cursor_flash_time_ms: 800,
            ..PlatformTheme::default()
        };
        assert_eq!(theme.blink_interval(), Some(Duration::from_millis(400)));

        let off = PlatformTheme {
            cursor_blinking: false,
            ..theme
        };
        assert_eq!(off.blink_interval(), None);

        let zero = PlatformTheme {
            cursor_flash_time_ms: 0,
            ..theme
        };
        assert_eq!(zero.blink_interval(), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let theme = PlatformTheme::from_yaml("start_drag_distance: 4.5\nkeyboard_scheme: mac\n")
            .unwrap();
        assert_eq!(theme.start_drag_distance, 4.5);
        assert_eq!(theme.keyboard_scheme, KeyboardScheme::Mac);
        assert_eq!(theme.cursor_flash_time_ms, 1000);
    }

    #[test]
    fn test_global_is_cached() {
        let a = PlatformTheme::global() as *const PlatformTheme;
        let b = PlatformTheme::global() as *const PlatformTheme;
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_scheme_sets_selection_clipboard() {
        assert!(PlatformTheme::with_scheme(KeyboardScheme::X11).supports_selection_clipboard);
        assert!(!PlatformTheme::with_scheme(KeyboardScheme::Mac).supports_selection_clipboard);
    }
}
