use std::{io, path::PathBuf};

use thiserror::Error;

use vellum::{error::RenderError, settings::SettingsError};

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Validation(#[from] vellum::error::ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("Failed to format export timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}
