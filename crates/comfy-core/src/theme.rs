//! # Theme Preference
//!
//! The user's colour theme choice, persisted under the `theme` key.
//!
//! `System` defers to the platform setting; [`Theme::resolve`] turns any
//! preference into the concrete mode to apply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Stored theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    Dark,
    Light,
    #[default]
    System,
}

/// The mode actually applied to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Dark,
    Light,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Dark => "dark",
            ColorMode::Light => "light",
        }
    }
}

impl Theme {
    /// Resolves the preference against the platform's dark-mode setting.
    pub fn resolve(self, system_prefers_dark: bool) -> ColorMode {
        match self {
            Theme::Dark => ColorMode::Dark,
            Theme::Light => ColorMode::Light,
            Theme::System if system_prefers_dark => ColorMode::Dark,
            Theme::System => ColorMode::Light,
        }
    }

    /// Persisted spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "system" => Ok(Theme::System),
            _ => Err(ValidationError::NotAllowed {
                field: "theme".to_string(),
                allowed: vec!["dark".to_string(), "light".to_string(), "system".to_string()],
            }),
        }
    }
}
