//! Vellum Core Types and Definitions
//!
//! This crate provides the shared vocabulary of the Vellum rendering
//! pipeline. It includes:
//!
//! - **Artifacts**: Opaque rendered SVG payloads ([`artifact::VectorArtifact`])
//! - **Outcomes**: What the presentation layer displays ([`outcome::RenderOutcome`])
//! - **Errors**: Engine failures and the render error taxonomy ([`error`] module)
//! - **Generations**: Attempt numbering and render ids ([`generation`] module)
//! - **Configuration**: Trigger knobs and user settings ([`config`], [`settings`])
//! - **Engine**: The capability every renderer implements ([`engine::RenderEngine`])

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod outcome;
pub mod settings;
