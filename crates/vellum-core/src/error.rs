//! Error types shared across the Vellum crates.
//!
//! - [`EngineError`] is what a [`RenderEngine`](crate::engine::RenderEngine)
//!   reports when a call fails.
//! - [`RenderError`] is the user-facing taxonomy a render attempt settles into.
//! - [`ConfigError`] covers invalid configuration values.

use std::{fmt, io};

use thiserror::Error;

/// Message shown when an engine fails without saying why.
pub const FALLBACK_MESSAGE: &str = "Error rendering diagram";

/// Message shown for empty or whitespace-only input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some Mermaid code";

/// Message shown when the engine's validator rejects the text.
pub const INVALID_SYNTAX_MESSAGE: &str = "Invalid Mermaid syntax";

/// A failure reported by a render engine.
///
/// Engines are free to fail without a message; in that case the error
/// displays [`FALLBACK_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineError {
    message: Option<String>,
}

impl EngineError {
    /// Create an engine error with a message.
    ///
    /// Blank messages are treated as absent.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = (!message.trim().is_empty()).then_some(message);
        Self { message }
    }

    /// Create an engine error that carries no message.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// The engine-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or(FALLBACK_MESSAGE))
    }
}

impl std::error::Error for EngineError {}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Coarse category of a [`RenderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Nothing to render; the user should type something.
    EmptyInput,
    /// The text was rejected before rendering.
    Syntax,
    /// The engine failed while rendering accepted text.
    Render,
}

/// Why a render attempt produced no artifact.
///
/// The `Display` output of every variant is the exact message shown to the
/// user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    #[error("{}", INVALID_SYNTAX_MESSAGE)]
    InvalidSyntax,

    /// The validator itself failed instead of answering.
    #[error("{0}")]
    Syntax(EngineError),

    #[error("{0}")]
    Render(EngineError),

    /// The attempt ended without settling (for example its task panicked).
    #[error("{}", FALLBACK_MESSAGE)]
    Aborted,
}

impl RenderError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::EmptyInput => ErrorKind::EmptyInput,
            RenderError::InvalidSyntax | RenderError::Syntax(_) => ErrorKind::Syntax,
            RenderError::Render(_) | RenderError::Aborted => ErrorKind::Render,
        }
    }

    /// Returns `true` for guidance errors that do not indicate a failure.
    pub fn is_guidance(&self) -> bool {
        self.kind() == ErrorKind::EmptyInput
    }
}

/// Configuration-value errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_fallback() {
        assert_eq!(EngineError::unknown().to_string(), "Error rendering diagram");
        assert_eq!(EngineError::new("   ").to_string(), "Error rendering diagram");
        assert_eq!(EngineError::new("Parse error on line 2").to_string(), "Parse error on line 2");
    }

    #[test]
    fn test_render_error_messages() {
        assert_eq!(RenderError::EmptyInput.to_string(), "Please enter some Mermaid code");
        assert_eq!(RenderError::InvalidSyntax.to_string(), "Invalid Mermaid syntax");
        assert_eq!(
            RenderError::Render(EngineError::new("boom")).to_string(),
            "boom"
        );
        assert_eq!(RenderError::Aborted.to_string(), "Error rendering diagram");
    }

    #[test]
    fn test_render_error_kinds() {
        assert!(RenderError::EmptyInput.is_guidance());
        assert_eq!(RenderError::InvalidSyntax.kind(), ErrorKind::Syntax);
        assert_eq!(
            RenderError::Syntax(EngineError::unknown()).kind(),
            ErrorKind::Syntax
        );
        assert_eq!(RenderError::Aborted.kind(), ErrorKind::Render);
    }
}
