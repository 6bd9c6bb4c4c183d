//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! The library crates use plain `thiserror` enums; this module attaches the
//! diagnostic codes and help texts used when the binary reports a failure.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use vellum::{error::RenderError, settings::SettingsError, templates::templates};

use crate::{config::ConfigError, error::CliError};

/// Adapter giving a [`CliError`] a miette presentation.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Io(_) | CliError::Input { .. } => "vellum::io",
            CliError::Config(_) | CliError::Validation(_) => "vellum::config",
            CliError::Settings(_) => "vellum::settings",
            CliError::Render(RenderError::EmptyInput) => "vellum::empty_input",
            CliError::Render(RenderError::InvalidSyntax | RenderError::Syntax(_)) => {
                "vellum::syntax"
            }
            CliError::Render(RenderError::Render(_) | RenderError::Aborted) => "vellum::render",
            CliError::UnknownTemplate(_) => "vellum::template",
            CliError::Watch { .. } => "vellum::watch",
            CliError::Timestamp(_) => "vellum::output",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: String = match &self.0 {
            CliError::Render(RenderError::EmptyInput) => {
                "Write some Mermaid code, or start from `vellum new <template>`".to_string()
            }
            CliError::Render(RenderError::InvalidSyntax) => {
                "The first line must name a diagram type, e.g. `flowchart TD`".to_string()
            }
            CliError::UnknownTemplate(_) => {
                let keys: Vec<&str> = templates().iter().map(|t| t.key).collect();
                format!("Available templates: {}", keys.join(", "))
            }
            CliError::Config(ConfigError::MissingFile(_)) => {
                "Omit --config to search the default locations".to_string()
            }
            CliError::Settings(SettingsError::Parse { path, .. }) => {
                format!("Fix or delete {} to restore defaults", path.display())
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use vellum::{config::RenderDelay, error::EngineError};

    use super::*;

    fn code_of(err: &CliError) -> Option<String> {
        ErrorAdapter(err).code().map(|code| code.to_string())
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            code_of(&CliError::Render(RenderError::InvalidSyntax)).as_deref(),
            Some("vellum::syntax")
        );
        assert_eq!(
            code_of(&CliError::Render(RenderError::Render(EngineError::unknown()))).as_deref(),
            Some("vellum::render")
        );
        assert_eq!(
            code_of(&CliError::Config(ConfigError::MissingFile(PathBuf::from("x.toml"))))
                .as_deref(),
            Some("vellum::config")
        );
    }

    #[test]
    fn test_out_of_range_delay_reports_as_config() {
        let err = CliError::from(RenderDelay::from_millis(5000).expect_err("delay is out of range"));

        assert!(matches!(
            err,
            CliError::Validation(vellum::error::ConfigError::Validation(_))
        ));
        assert_eq!(code_of(&err).as_deref(), Some("vellum::config"));
        assert!(err.to_string().contains("got 5000"), "message: {err}");
    }

    #[test]
    fn test_unknown_template_help_lists_keys() {
        let err = CliError::UnknownTemplate("sankey".to_string());
        let adapter = ErrorAdapter(&err);

        let help = adapter.help().map(|h| h.to_string()).unwrap_or_default();

        assert!(help.contains("flowchart"));
        assert!(help.contains("timeline"));
        assert_eq!(adapter.to_string(), "Unknown template `sankey`");
    }

    #[test]
    fn test_render_error_message_passes_through() {
        let err = CliError::Render(RenderError::Render(EngineError::new("Parse error on line 2")));

        assert_eq!(ErrorAdapter(&err).to_string(), "Parse error on line 2");
        assert!(ErrorAdapter(&err).help().is_none());
    }
}
