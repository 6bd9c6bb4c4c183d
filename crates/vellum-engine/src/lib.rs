//! Render engines for Vellum.
//!
//! [`CommandEngine`] renders through the Mermaid command-line tool and
//! validates in-process with [`detect`], which recognizes the diagram type
//! from the text header.

pub mod config;
pub mod detect;

mod command;

pub use command::CommandEngine;
pub use config::EngineConfig;
pub use detect::{DetectError, DiagramKind, detect};
