//! Preview output for the watch loop.
//!
//! The preview file always holds an SVG. A rendered outcome is written
//! verbatim; otherwise a placeholder card shows the error message or the
//! idle hint, coloured by the user's theme.

use serde::Deserialize;
use svg::{
    Document,
    node::{
        Text as SvgText,
        element::{Rectangle, TSpan, Text},
    },
};

use vellum::{outcome::RenderOutcome, settings::Theme};

/// Text shown before anything has been rendered.
pub const IDLE_HINT: &str = "Your diagram will appear here";

/// Placeholder dimensions and typography.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub font_size: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            font_family: "sans-serif".to_string(),
            font_size: 16,
        }
    }
}

/// Colours used for placeholders under one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: &'static str,
    text: &'static str,
    error: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Silk => Palette {
            background: "#faf8f5",
            text: "#6b6358",
            error: "#c0392b",
        },
        Theme::Abyss => Palette {
            background: "#0f1722",
            text: "#9fb3c8",
            error: "#ff6b6b",
        },
        Theme::Cyberpunk => Palette {
            background: "#0d0221",
            text: "#00f0ff",
            error: "#ff2a6d",
        },
    }
}

/// SVG markup to show for `outcome`.
pub fn preview_markup(outcome: &RenderOutcome, theme: Theme, config: &PreviewConfig) -> String {
    match outcome {
        RenderOutcome::Rendered(artifact) => artifact.as_str().to_string(),
        RenderOutcome::Failed(err) => placeholder(Some(&err.to_string()), theme, config),
        RenderOutcome::Idle => placeholder(None, theme, config),
    }
}

/// Build a placeholder card showing `message`, or the idle hint when `None`.
pub fn placeholder(message: Option<&str>, theme: Theme, config: &PreviewConfig) -> String {
    let palette = palette(theme);
    let (content, color) = match message {
        Some(message) => (message, palette.error),
        None => (IDLE_HINT, palette.text),
    };

    let width = config.width;
    let height = config.height;
    let line_height = f32::from(config.font_size) * 1.4;
    let lines: Vec<&str> = content.lines().collect();
    // Center the block of lines vertically.
    let first_y = height as f32 / 2.0 - line_height * (lines.len().saturating_sub(1)) as f32 / 2.0;

    let background = Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", width)
        .set("height", height)
        .set("fill", palette.background);

    let mut text = Text::new("")
        .set("x", width / 2)
        .set("y", first_y)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-family", config.font_family.as_str())
        .set("font-size", config.font_size)
        .set("fill", color);

    for (index, line) in lines.into_iter().enumerate() {
        let dy = if index == 0 { 0.0 } else { line_height };
        let tspan = TSpan::new("")
            .set("x", width / 2)
            .set("dy", dy)
            .add(SvgText::new(line));
        text = text.add(tspan);
    }

    Document::new()
        .set("viewBox", format!("0 0 {width} {height}"))
        .set("width", width)
        .set("height", height)
        .set("data-theme", theme.as_str())
        .add(background)
        .add(text)
        .to_string()
}

#[cfg(test)]
mod tests {
    use vellum::{artifact::VectorArtifact, error::RenderError};

    use super::*;

    #[test]
    fn test_rendered_outcome_is_verbatim() {
        let outcome = RenderOutcome::Rendered(VectorArtifact::from("<svg>ok</svg>"));

        let markup = preview_markup(&outcome, Theme::Abyss, &PreviewConfig::default());

        assert_eq!(markup, "<svg>ok</svg>");
    }

    #[test]
    fn test_idle_shows_hint() {
        let markup = preview_markup(&RenderOutcome::Idle, Theme::Silk, &PreviewConfig::default());

        assert!(markup.contains(IDLE_HINT));
        assert!(markup.contains("#faf8f5"));
        assert!(markup.contains("data-theme=\"silk\""));
    }

    #[test]
    fn test_error_uses_theme_error_color() {
        let outcome = RenderOutcome::Failed(RenderError::InvalidSyntax);

        let markup = preview_markup(&outcome, Theme::Cyberpunk, &PreviewConfig::default());

        assert!(markup.contains("Invalid Mermaid syntax"));
        assert!(markup.contains("#ff2a6d"));
        assert!(!markup.contains(IDLE_HINT));
    }

    #[test]
    fn test_multiline_message_gets_one_span_per_line() {
        let markup = placeholder(
            Some("Parse error on line 2\nExpecting SEMI"),
            Theme::Silk,
            &PreviewConfig::default(),
        );

        assert_eq!(markup.matches("<tspan").count(), 2);
        assert!(markup.contains("Parse error on line 2"));
        assert!(markup.contains("Expecting SEMI"));
    }
}
