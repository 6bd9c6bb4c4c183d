//! Command-line argument definitions for the Vellum CLI.
//!
//! Global flags select the configuration file, the settings file and the
//! logging verbosity. Each subcommand carries its own arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vellum::settings::Theme;

/// Live, debounced rendering of Mermaid diagrams
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the settings file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a diagram file once
    Render(RenderArgs),

    /// Re-render a diagram file whenever it changes
    Watch(WatchArgs),

    /// List the starter templates
    Templates,

    /// Write a starter template
    New(NewArgs),

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Path to the input Mermaid file
    pub input: PathBuf,

    /// Output SVG file, or a directory to place a timestamped file in
    #[arg(short, long, default_value = "out.svg")]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct WatchArgs {
    /// Path to the input Mermaid file
    pub input: PathBuf,

    /// Output SVG file, or a directory to place a timestamped file in
    #[arg(short, long, default_value = "out.svg")]
    pub output: PathBuf,

    /// Render only when Enter is pressed
    #[arg(long)]
    pub manual: bool,

    /// Debounce delay in milliseconds for this session (100-1000)
    #[arg(long)]
    pub delay: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Template key, as listed by `vellum templates`
    pub template: String,

    /// File to write; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set {
        /// Color theme (silk, abyss, cyberpunk)
        #[arg(long)]
        theme: Option<Theme>,

        /// Render automatically after typing pauses
        #[arg(long)]
        auto_render: Option<bool>,

        /// Debounce delay in milliseconds (100-1000)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Restore default settings
    Reset,
}
