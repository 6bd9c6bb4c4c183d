//! CLI logic for the Vellum diagram tool.
//!
//! [`run`] dispatches a parsed [`Args`] to the matching command. Commands log
//! through the `log` facade and return [`CliError`]; presenting the error is
//! left to the binary.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod output;
mod preview;
mod watch;

pub use args::{Args, Command, NewArgs, RenderArgs, SettingsAction, WatchArgs};
pub use config::{AppConfig, ConfigError, load_config};
pub use error::CliError;
pub use output::{export_file_name, resolve_output};
pub use preview::{IDLE_HINT, PreviewConfig, placeholder, preview_markup};

use std::{path::Path, sync::Arc};

use log::{info, warn};
use time::OffsetDateTime;
use tokio::fs;

use vellum::{
    RenderSession,
    config::RenderDelay,
    engine::RenderEngine,
    error::RenderError,
    generation::{GenerationCounter, RenderId},
    outcome::RenderOutcome,
    settings::{FileSettingsStore, MemorySettingsStore, SettingsManager, SettingsUpdate},
    templates::{template, templates},
};
use vellum_engine::CommandEngine;

/// Run the Vellum CLI application
///
/// # Errors
///
/// Returns [`CliError`] for:
/// - File I/O errors
/// - Configuration and settings errors
/// - Failed renders (`render` only; `watch` shows failures in the preview)
pub async fn run(args: &Args) -> Result<(), CliError> {
    // Export names use the time the command started, not the time it finished.
    let started_at = OffsetDateTime::now_utc();

    match &args.command {
        Command::Render(render) => {
            let app_config = config::load_config(args.config.as_ref())?;
            let output = output::resolve_output(&render.output, started_at)?;
            render_once(&render.input, &output, &app_config).await
        }
        Command::Watch(watch_args) => {
            let app_config = config::load_config(args.config.as_ref())?;
            let settings = Arc::new(open_settings(args.settings.as_deref())?);
            let output = output::resolve_output(&watch_args.output, started_at)?;
            watch::watch(watch_args, output, &app_config, settings).await
        }
        Command::Templates => {
            for template in templates() {
                println!("{:<14} {}", template.key, template.name);
            }
            Ok(())
        }
        Command::New(new) => write_template(new).await,
        Command::Settings { action } => {
            let settings = open_settings(args.settings.as_deref())?;
            manage_settings(action, &settings)
        }
    }
}

async fn render_once(input: &Path, output: &Path, app_config: &AppConfig) -> Result<(), CliError> {
    info!(
        input_path = input.display().to_string(),
        output_path = output.display().to_string();
        "Processing diagram"
    );

    let text = fs::read_to_string(input)
        .await
        .map_err(|source| CliError::Input {
            path: input.to_path_buf(),
            source,
        })?;

    let engine: Arc<dyn RenderEngine> = Arc::new(CommandEngine::new(app_config.engine.clone()));
    let session = RenderSession::new(engine);
    let id = RenderId::new(GenerationCounter::new().next());

    let artifact = match session.run(&id, &text).await {
        RenderOutcome::Rendered(artifact) => artifact,
        RenderOutcome::Failed(err) => return Err(err.into()),
        RenderOutcome::Idle => return Err(RenderError::EmptyInput.into()),
    };

    fs::write(output, artifact.as_bytes()).await?;
    info!(output_file = output.display().to_string(); "SVG exported successfully");

    Ok(())
}

async fn write_template(args: &NewArgs) -> Result<(), CliError> {
    let template =
        template(&args.template).ok_or_else(|| CliError::UnknownTemplate(args.template.clone()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, template.source).await?;
            info!(
                template = template.key,
                output_file = path.display().to_string();
                "Template written"
            );
        }
        None => println!("{}", template.source),
    }
    Ok(())
}

/// Open the user settings, from `path` or the platform default location.
///
/// Without a usable default location settings live in memory for this run.
fn open_settings(path: Option<&Path>) -> Result<SettingsManager, CliError> {
    let store = match path {
        Some(path) => FileSettingsStore::new(path),
        None => match FileSettingsStore::default_location() {
            Ok(store) => store,
            Err(err) => {
                warn!(err:%; "Settings will not be persisted");
                return Ok(SettingsManager::load(MemorySettingsStore::new()));
            }
        },
    };
    info!(path = store.path().display().to_string(); "Using settings file");
    Ok(SettingsManager::load(store))
}

fn manage_settings(action: &SettingsAction, settings: &SettingsManager) -> Result<(), CliError> {
    let current = match action {
        SettingsAction::Show => settings.get(),
        SettingsAction::Set {
            theme,
            auto_render,
            delay,
        } => {
            let update = SettingsUpdate {
                theme: *theme,
                auto_render: *auto_render,
                render_delay: delay.map(RenderDelay::from_millis).transpose()?,
            };
            if update.is_empty() {
                warn!("No settings given, nothing changed");
                settings.get()
            } else {
                settings.update(update)?
            }
        }
        SettingsAction::Reset => settings.reset()?,
    };

    println!("theme        = {}", current.theme);
    println!("auto-render  = {}", current.auto_render);
    println!("render-delay = {}", current.render_delay.as_millis());
    Ok(())
}
