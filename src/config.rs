//! Configuration for roam.
//!
//! Loaded once at startup from a TOML file (`ROAM_CONFIG` env override,
//! otherwise `<config dir>/roam/roam.toml`). A missing file yields the
//! defaults; an unreadable or invalid file yields the defaults with a
//! warning on stderr. Everything here is display-only; navigation
//! behavior comes from the CLI.

use crate::utils::parse_color;

use ratatui::style::{Color, Style};
use serde::Deserialize;

use std::path::PathBuf;

/// Raw deserialization target; every field is optional so partial
/// config files work.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub display: RawDisplay,
    #[serde(default)]
    pub theme: RawTheme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDisplay {
    pub dir_marker: Option<bool>,
    pub title_bar: Option<bool>,
    pub key_hints: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTheme {
    pub accent: Option<String>,
    pub directory: Option<String>,
    pub selection_fg: Option<String>,
    pub selection_bg: Option<String>,
    pub marker_icon: Option<String>,
}

/// Resolved configuration used by the renderer.
#[derive(Debug, Clone)]
pub struct Config {
    dir_marker: bool,
    title_bar: bool,
    key_hints: bool,
    accent: Color,
    directory: Color,
    selection: Style,
    marker_icon: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir_marker: true,
            title_bar: true,
            key_hints: true,
            accent: Color::Cyan,
            directory: Color::Blue,
            selection: Style::default().fg(Color::Black).bg(Color::Cyan),
            marker_icon: "*".to_owned(),
        }
    }
}

impl Config {
    /// Default config file location, honoring the `ROAM_CONFIG` override.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(custom) = std::env::var("ROAM_CONFIG") {
            return Some(PathBuf::from(custom));
        }
        dirs::config_dir().map(|dir| dir.join("roam").join("roam.toml"))
    }

    /// Loads the config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str::<RawConfig>(&text) {
            Ok(raw) => Self::from(raw),
            Err(e) => {
                eprintln!("[roam] Warning: invalid config '{}': {e}", path.display());
                Self::default()
            }
        }
    }

    // Accessors

    #[inline]
    pub fn dir_marker(&self) -> bool {
        self.dir_marker
    }

    #[inline]
    pub fn title_bar(&self) -> bool {
        self.title_bar
    }

    #[inline]
    pub fn key_hints(&self) -> bool {
        self.key_hints
    }

    #[inline]
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    #[inline]
    pub fn directory_style(&self) -> Style {
        Style::default().fg(self.directory)
    }

    #[inline]
    pub fn selection_style(&self) -> Style {
        self.selection
    }

    #[inline]
    pub fn marker_icon(&self) -> &str {
        &self.marker_icon
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let defaults = Config::default();

        let mut selection = defaults.selection;
        if let Some(fg) = raw.theme.selection_fg.as_deref() {
            selection = selection.fg(parse_color(fg));
        }
        if let Some(bg) = raw.theme.selection_bg.as_deref() {
            selection = selection.bg(parse_color(bg));
        }

        Self {
            dir_marker: raw.display.dir_marker.unwrap_or(defaults.dir_marker),
            title_bar: raw.display.title_bar.unwrap_or(defaults.title_bar),
            key_hints: raw.display.key_hints.unwrap_or(defaults.key_hints),
            accent: raw
                .theme
                .accent
                .as_deref()
                .map(parse_color)
                .unwrap_or(defaults.accent),
            directory: raw
                .theme
                .directory
                .as_deref()
                .map(parse_color)
                .unwrap_or(defaults.directory),
            selection,
            marker_icon: raw.theme.marker_icon.unwrap_or(defaults.marker_icon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_config() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawConfig = toml::from_str("")?;
        let config = Config::from(raw);
        assert!(config.dir_marker());
        assert!(config.title_bar());
        assert_eq!(config.marker_icon(), "*");
        Ok(())
    }

    #[test]
    fn partial_override() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawConfig = toml::from_str(
            r##"
            [display]
            dir_marker = false

            [theme]
            directory = "#ff8800"
            selection_bg = "magenta"
            "##,
        )?;
        let config = Config::from(raw);
        assert!(!config.dir_marker());
        assert!(config.title_bar());
        assert_eq!(
            config.directory_style().fg,
            Some(Color::Rgb(0xff, 0x88, 0x00))
        );
        assert_eq!(config.selection_style().bg, Some(Color::Magenta));
        Ok(())
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<RawConfig>("[display]\nnope = 1").is_err());
    }
}
