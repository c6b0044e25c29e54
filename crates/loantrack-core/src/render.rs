//! # Rendering Palette
//!
//! Cosmetic mapping from [`Indicator`] to colour tokens, icon names and
//! terminal glyphs. Changing a palette never changes which stages are
//! shown or how they are classified.

use crate::system::{DisplayStage, Indicator, TrackerView};
use crate::TrackerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// SWATCH
// =============================================================================

/// Presentation tokens for one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Swatch {
    /// Colour token (CSS hex).
    pub color: &'static str,
    /// Icon name understood by the dashboard icon set.
    pub icon: &'static str,
    /// Single-character marker for terminal output.
    pub glyph: char,
}

// =============================================================================
// THEME
// =============================================================================

/// Dashboard colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Swatch for an indicator under this theme.
    #[must_use]
    pub fn swatch(&self, indicator: Indicator) -> Swatch {
        let (icon, glyph) = match indicator {
            Indicator::Success => ("check-circle", '✔'),
            Indicator::Failure => ("x-circle", '✘'),
            Indicator::InProgress => ("loader", '◐'),
            Indicator::Neutral => ("circle", '○'),
        };
        let color = match (self, indicator) {
            (Theme::Light, Indicator::Success) => "#16a34a",
            (Theme::Light, Indicator::Failure) => "#dc2626",
            (Theme::Light, Indicator::InProgress) => "#d97706",
            (Theme::Light, Indicator::Neutral) => "#9ca3af",
            (Theme::Dark, Indicator::Success) => "#4ade80",
            (Theme::Dark, Indicator::Failure) => "#f87171",
            (Theme::Dark, Indicator::InProgress) => "#fbbf24",
            (Theme::Dark, Indicator::Neutral) => "#4b5563",
        };
        Swatch { color, icon, glyph }
    }

    /// Render one row as a plain text line.
    #[must_use]
    pub fn render_row(&self, row: &DisplayStage) -> String {
        let swatch = self.swatch(row.indicator);
        format!("{} {:<24} {}", swatch.glyph, row.label, row.state)
    }

    /// Render a whole view as plain text, one stage per line.
    #[must_use]
    pub fn render_text(&self, view: &TrackerView) -> String {
        view.stages
            .iter()
            .map(|row| self.render_row(row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(TrackerError::InvalidTheme(s.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
