//! Theme preference, color palettes and ANSI escape sequence generation.
//!
//! The user picks a [`ThemeMode`]; `System` is resolved against the terminal's
//! `COLORFGBG` hint. Each resolved mode has a built-in palette shipped as a TOML
//! file and compiled into the binary.
//!
//! # TOML Format
//!
//! ```toml
//! name = "dark"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! position_fg = "#89b4fa"
//! empty_state_fg = "#89b4fa"
//! success_fg = "#a6e3a1"
//! info_fg = "#89dceb"
//! warning_fg = "#f9e2af"
//! danger_fg = "#f38ba8"
//! external_fg = "#cba6f7"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::ui::theme::{Theme, ThemeMode};
//!
//! let mode = ThemeMode::Light.toggled();
//! assert_eq!(mode, ThemeMode::Dark);
//!
//! let theme = Theme::for_mode(mode, None)?;
//! print!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! # Ok::<(), shelfkeeper::CatalogError>(())
//! ```

use crate::app::NotificationTone;
use crate::domain::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage key of the persisted theme preference.
pub const THEME_PREFERENCE_KEY: &str = "app-theme";

/// The user's theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// A theme preference with `System` resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appearance {
    Light,
    Dark,
}

impl ThemeMode {
    /// Next mode in the `light → dark → system → light` cycle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
            Self::System => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Resolves the preference to a concrete appearance.
    ///
    /// `colorfgbg` is the terminal's `COLORFGBG` value (`"15;0"` means light
    /// text on a black background). `System` falls back to dark when the hint
    /// is missing or unreadable.
    #[must_use]
    pub fn resolve(self, colorfgbg: Option<&str>) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::System => colorfgbg
                .and_then(|value| value.rsplit(';').next())
                .and_then(|bg| bg.trim().parse::<u8>().ok())
                .map_or(Appearance::Dark, |bg| {
                    if bg == 7 || bg >= 9 {
                        Appearance::Light
                    } else {
                        Appearance::Dark
                    }
                }),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(CatalogError::Config(format!("unknown theme mode: {other}"))),
        }
    }
}

/// Color scheme configuration for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    pub text_normal: String,
    /// Secondary text (authors, footer hints).
    pub text_dim: String,
    /// Separator line color.
    pub border: String,
    /// Row numbers used to address entries.
    pub position_fg: String,
    pub empty_state_fg: String,
    pub success_fg: String,
    pub info_fg: String,
    pub warning_fg: String,
    pub danger_fg: String,
    /// Badge of remote hits that are not in the library.
    pub external_fg: String,
}

impl Theme {
    /// Loads the built-in palette for an appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML fails to parse.
    pub fn builtin(appearance: Appearance) -> Result<Self> {
        let toml_str = match appearance {
            Appearance::Light => include_str!("../../themes/light.toml"),
            Appearance::Dark => include_str!("../../themes/dark.toml"),
        };

        toml::from_str(toml_str)
            .map_err(|e| CatalogError::Config(format!("failed to parse built-in theme: {e}")))
    }

    /// Resolves `mode` and loads the matching palette.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML fails to parse.
    pub fn for_mode(mode: ThemeMode, colorfgbg: Option<&str>) -> Result<Self> {
        Self::builtin(mode.resolve(colorfgbg))
    }

    /// Foreground color of a notification tone.
    #[must_use]
    pub fn tone_fg(&self, tone: NotificationTone) -> &str {
        match tone {
            NotificationTone::Success => &self.colors.success_fg,
            NotificationTone::Info => &self.colors.info_fg,
            NotificationTone::Warning => &self.colors.warning_fg,
            NotificationTone::Danger => &self.colors.danger_fg,
        }
    }

    /// Converts a hex color to an RGB tuple, white on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    ///
    /// ```rust
    /// use shelfkeeper::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff0080"), "\u{1b}[38;2;255;0;128m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_cycles_through_all_modes() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::System);
        assert_eq!(ThemeMode::System.toggled(), ThemeMode::Light);
    }

    #[test]
    fn system_resolves_from_colorfgbg() {
        assert_eq!(ThemeMode::System.resolve(Some("15;0")), Appearance::Dark);
        assert_eq!(ThemeMode::System.resolve(Some("0;15")), Appearance::Light);
        assert_eq!(ThemeMode::System.resolve(Some("0;default;7")), Appearance::Light);
        assert_eq!(ThemeMode::System.resolve(Some("garbage")), Appearance::Dark);
        assert_eq!(ThemeMode::System.resolve(None), Appearance::Dark);
        assert_eq!(ThemeMode::Light.resolve(Some("15;0")), Appearance::Light);
    }

    #[test]
    fn builtin_palettes_parse() {
        assert_eq!(Theme::builtin(Appearance::Light).unwrap().name, "light");
        assert_eq!(Theme::builtin(Appearance::Dark).unwrap().name, "dark");
    }

    #[test]
    fn modes_parse_from_names() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System] {
            assert_eq!(mode.as_str().parse::<ThemeMode>().unwrap(), mode);
        }
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("#abc"), "\u{1b}[38;2;255;255;255m");
    }
}
