//! Vellum - live, debounced rendering of diagram text.
//!
//! Vellum sits between an editor and a diagram engine. The editor reports
//! every text change; Vellum waits for typing to pause, validates and renders
//! the newest text, and publishes exactly one current outcome (an SVG
//! artifact, an error message, or idle). Results of attempts that were
//! overtaken by newer input are computed but never shown.
//!
//! The pieces, leaf first:
//!
//! - [`DebounceScheduler`] coalesces bursts of changes into one trigger.
//! - [`RenderSession`] runs one attempt and folds failures into an outcome.
//! - [`RenderController`] ties both together and guards against stale results.
//! - [`settings::SettingsManager`] supplies the auto-render and delay knobs.

pub mod settings;
pub mod templates;

mod controller;
mod scheduler;
mod session;

pub use vellum_core::{artifact, config, engine, error, generation, outcome};

pub use controller::{ControllerBuilder, OutcomeListener, RenderController, RenderSnapshot};
pub use scheduler::DebounceScheduler;
pub use session::RenderSession;
