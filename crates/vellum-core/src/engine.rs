//! The render engine capability.
//!
//! Vellum does not understand diagram grammars. It drives an engine that
//! does, through the [`RenderEngine`] trait.

use async_trait::async_trait;

use crate::{artifact::VectorArtifact, error::EngineError, generation::RenderId};

/// A diagram engine that can validate and render description text.
///
/// Both calls may be slow and both may fail. A validator may report invalid
/// text either by returning `Ok(false)` or by returning an error; callers must
/// handle both.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Statically check whether `text` is a diagram the engine accepts.
    async fn validate(&self, text: &str) -> Result<bool, EngineError>;

    /// Render `text` into SVG markup.
    ///
    /// `id` is unique per attempt; engines may use it to namespace element
    /// ids inside the produced markup.
    async fn render(&self, id: &RenderId, text: &str) -> Result<VectorArtifact, EngineError>;
}
