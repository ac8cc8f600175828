//! # Theme
//!
//! The resolved color record for the screen. Built once at startup from the
//! config's raw color strings and passed explicitly into every render
//! function — no ambient provider, no global.

use ratatui::style::Color;
use std::fmt;

use crate::core::config::ThemeConfig;

/// Colors for every surface of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Fill behind the whole screen.
    pub background: Color,
    /// Borders and separators.
    pub line_color: Color,
    /// Message and input text.
    pub font_color: Color,
    /// Placeholders and dimmed chrome.
    pub status: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            line_color: Color::DarkGray,
            font_color: Color::White,
            status: Color::DarkGray,
        }
    }
}

#[derive(Debug)]
pub struct ThemeError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "theme color `{}` is not a recognized color: {:?}",
            self.field, self.value
        )
    }
}

impl std::error::Error for ThemeError {}

impl Theme {
    /// Parse the config's color strings, keeping defaults for absent fields.
    pub fn from_config(config: &ThemeConfig) -> Result<Self, ThemeError> {
        let defaults = Self::default();
        Ok(Self {
            background: parse_color("background", &config.background, defaults.background)?,
            line_color: parse_color("line_color", &config.line_color, defaults.line_color)?,
            font_color: parse_color("font_color", &config.font_color, defaults.font_color)?,
            status: parse_color("status", &config.status, defaults.status)?,
        })
    }
}

fn parse_color(
    field: &'static str,
    raw: &Option<String>,
    default: Color,
) -> Result<Color, ThemeError> {
    match raw {
        Some(value) => value.parse::<Color>().map_err(|_| ThemeError {
            field,
            value: value.clone(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn named_and_hex_colors_parse() {
        let config = ThemeConfig {
            background: Some("#101010".to_string()),
            line_color: Some("gray".to_string()),
            font_color: Some("cyan".to_string()),
            status: None,
        };
        let theme = Theme::from_config(&config).unwrap();
        assert_eq!(theme.background, Color::Rgb(0x10, 0x10, 0x10));
        assert_eq!(theme.line_color, Color::Gray);
        assert_eq!(theme.font_color, Color::Cyan);
        assert_eq!(theme.status, Theme::default().status);
    }

    #[test]
    fn unknown_color_is_an_error_naming_the_field() {
        let config = ThemeConfig {
            font_color: Some("notacolor".to_string()),
            ..Default::default()
        };
        let err = Theme::from_config(&config).unwrap_err();
        assert_eq!(err.field, "font_color");
    }
}
