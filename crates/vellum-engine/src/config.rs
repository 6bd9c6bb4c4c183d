//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// How to invoke the Mermaid command-line renderer.
///
/// Every field has a default, so an empty `[engine]` table (or none at all)
/// runs `mmdc` from `PATH` with Mermaid's default theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    program: PathBuf,
    theme: String,
    background: String,
    extra_args: Vec<String>,
}

impl EngineConfig {
    /// Create a configuration running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Set the Mermaid theme name passed with `--theme`.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the background color passed with `--backgroundColor`.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Append arguments after the standard ones.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("mmdc"),
            theme: "default".to_string(),
            background: "white".to_string(),
            extra_args: Vec::new(),
        }
    }
}
