//! Rendered vector artifacts.
//!
//! A [`VectorArtifact`] is the serialized SVG markup produced by a
//! [`RenderEngine`](crate::engine::RenderEngine). The pipeline never looks
//! inside it; it is stored, compared, and handed to the presentation layer as
//! an opaque payload.

use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};

/// Immutable SVG markup returned by a render engine.
///
/// Cloning is cheap: the markup is shared behind an [`Arc`], so the same
/// artifact can live in the controller state, in published snapshots, and in
/// listener callbacks without copying.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VectorArtifact(Arc<str>);

impl VectorArtifact {
    /// Create a new artifact from SVG markup.
    pub fn new(markup: impl Into<Arc<str>>) -> Self {
        Self(markup.into())
    }

    /// Returns the markup as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the markup as raw bytes, ready to be written to disk.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the markup in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the engine produced empty markup.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for VectorArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VectorArtifact")
            .field(&format_args!("{} bytes", self.len()))
            .finish()
    }
}

impl fmt::Display for VectorArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VectorArtifact {
    fn from(markup: String) -> Self {
        Self::new(markup)
    }
}

impl From<&str> for VectorArtifact {
    fn from(markup: &str) -> Self {
        Self::new(markup)
    }
}

impl AsRef<str> for VectorArtifact {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for VectorArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
