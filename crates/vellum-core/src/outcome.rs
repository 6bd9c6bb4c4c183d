//! The externally visible result of rendering.

use serde::Serialize;

use crate::{artifact::VectorArtifact, error::RenderError};

/// What the presentation layer should display.
///
/// Exactly one of idle, an artifact, or an error is current at any time.
/// A failure never carries an artifact, so an error always clears whatever
/// diagram was shown before.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderOutcome {
    /// No attempt has settled yet.
    #[default]
    Idle,
    /// The engine produced an artifact.
    Rendered(VectorArtifact),
    /// The attempt failed; the error's display text is the user message.
    Failed(RenderError),
}

impl RenderOutcome {
    /// Returns `true` before any attempt has settled.
    pub fn is_idle(&self) -> bool {
        matches!(self, RenderOutcome::Idle)
    }

    /// The rendered artifact, if this outcome is a success.
    pub fn artifact(&self) -> Option<&VectorArtifact> {
        match self {
            RenderOutcome::Rendered(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// The render error, if this outcome is a failure.
    pub fn error(&self) -> Option<&RenderError> {
        match self {
            RenderOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The user-facing error message, if this outcome is a failure.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Flatten into the `{ artifact, error }` pair handed to hosts.
    pub fn view(&self) -> OutcomeView {
        OutcomeView {
            artifact: self.artifact().map(|artifact| artifact.as_str().to_owned()),
            error: self.error_message(),
        }
    }
}

impl From<Result<VectorArtifact, RenderError>> for RenderOutcome {
    fn from(result: Result<VectorArtifact, RenderError>) -> Self {
        match result {
            Ok(artifact) => RenderOutcome::Rendered(artifact),
            Err(err) => RenderOutcome::Failed(err),
        }
    }
}

/// Host-facing projection of a [`RenderOutcome`].
///
/// At most one field is populated; both are `None` only while idle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeView {
    pub artifact: Option<String>,
    pub error: Option<String>,
}
