//! A single render attempt.
//!
//! [`RenderSession::run`] takes raw editor text through trimming, the empty
//! check, validation, and rendering, and folds every failure into a
//! [`RenderOutcome`]. It never returns an error and never retries.

use std::sync::Arc;

use log::{debug, info, warn};

use vellum_core::{
    artifact::VectorArtifact, engine::RenderEngine, error::RenderError, generation::RenderId,
    outcome::RenderOutcome,
};

/// Runs render attempts against an engine.
#[derive(Clone)]
pub struct RenderSession {
    engine: Arc<dyn RenderEngine>,
}

impl RenderSession {
    /// Create a session backed by `engine`.
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Render `text` once and report the outcome.
    ///
    /// Leading and trailing whitespace is removed before anything else. Empty
    /// input settles as [`RenderError::EmptyInput`] without calling the engine.
    pub async fn run(&self, id: &RenderId, text: &str) -> RenderOutcome {
        self.render(id, text).await.into()
    }

    async fn render(&self, id: &RenderId, text: &str) -> Result<VectorArtifact, RenderError> {
        let source = text.trim();
        if source.is_empty() {
            debug!(render_id:% = id; "Empty input, skipping engine");
            return Err(RenderError::EmptyInput);
        }

        debug!(render_id:% = id, source_len = source.len(); "Validating diagram");
        let valid = self.engine.validate(source).await.map_err(|err| {
            warn!(render_id:% = id, err:%; "Validator failed");
            RenderError::Syntax(err)
        })?;
        if !valid {
            debug!(render_id:% = id; "Validator rejected diagram");
            return Err(RenderError::InvalidSyntax);
        }

        let artifact = self.engine.render(id, source).await.map_err(|err| {
            warn!(render_id:% = id, err:%; "Render failed");
            RenderError::Render(err)
        })?;

        info!(render_id:% = id, svg_len = artifact.len(); "Diagram rendered");
        Ok(artifact)
    }
}
