//! User settings.
//!
//! [`Settings`] are the user-controlled preferences that outlive a single
//! editing session: the colour theme, automatic rendering, and the debounce
//! delay. Persistence is handled elsewhere; this module only defines the
//! values and how partial updates merge into them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::config::{RenderConfig, RenderDelay};

/// Visual theme of the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    #[default]
    Silk,
    /// Dark theme.
    Abyss,
    /// High-contrast neon theme.
    Cyberpunk,
}

impl Theme {
    /// All themes, in display order.
    pub const ALL: [Theme; 3] = [Theme::Silk, Theme::Abyss, Theme::Cyberpunk];

    /// Lowercase identifier used in settings files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Silk => "silk",
            Theme::Abyss => "abyss",
            Theme::Cyberpunk => "cyberpunk",
        }
    }

    /// Returns `true` for dark themes.
    pub fn is_dark(self) -> bool {
        !matches!(self, Theme::Silk)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme `{s}` (expected silk, abyss or cyberpunk)"))
    }
}

/// Persisted user preferences.
///
/// Every field is defaulted, so a stored file that only mentions some keys
/// merges over the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub theme: Theme,
    pub auto_render: bool,
    pub render_delay: RenderDelay,
}

impl Settings {
    /// Default settings: silk theme, automatic rendering, 300 ms delay.
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            auto_render: true,
            render_delay: RenderDelay::default(),
        }
    }

    /// The subset of settings the render controller cares about.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(self.auto_render, self.render_delay)
    }

    /// Returns a copy with `update` applied.
    pub fn merged(mut self, update: &SettingsUpdate) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(auto_render) = update.auto_render {
            self.auto_render = auto_render;
        }
        if let Some(render_delay) = update.render_delay {
            self.render_delay = render_delay;
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial change to [`Settings`]; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsUpdate {
    pub theme: Option<Theme>,
    pub auto_render: Option<bool>,
    pub render_delay: Option<RenderDelay>,
}

impl SettingsUpdate {
    /// Returns `true` if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.auto_render.is_none() && self.render_delay.is_none()
    }
}
