//! The live preview loop behind `vellum watch`.
//!
//! File-system events feed the controller exactly like keystrokes would feed
//! it from an editor; the controller's debounce and staleness guard decide
//! what gets rendered. Every settled snapshot rewrites the preview file.

use std::{
    future,
    io::{self, BufRead},
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use log::{debug, info, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::{fs, signal, sync::mpsc};

use vellum::{
    RenderController, RenderSnapshot,
    config::{ConfigSource, RenderConfig, RenderDelay},
    engine::RenderEngine,
    settings::SettingsManager,
};
use vellum_engine::CommandEngine;

use crate::{
    args::WatchArgs,
    config::AppConfig,
    error::CliError,
    preview::{PreviewConfig, preview_markup},
};

/// Render configuration for one watch session.
///
/// Reads the live user settings, with the command-line overrides applied on
/// top. Overrides are never persisted.
struct WatchConfig {
    settings: Arc<SettingsManager>,
    manual: bool,
    delay: Option<RenderDelay>,
}

impl ConfigSource for WatchConfig {
    fn render_config(&self) -> RenderConfig {
        let mut config = self.settings.render_config();
        if self.manual {
            config.auto_render = false;
        }
        if let Some(delay) = self.delay {
            config.render_delay = delay;
        }
        config
    }
}

/// Watch `args.input` and keep `output` up to date until Ctrl-C.
pub async fn watch(
    args: &WatchArgs,
    output: PathBuf,
    config: &AppConfig,
    settings: Arc<SettingsManager>,
) -> Result<(), CliError> {
    let input = fs::canonicalize(&args.input)
        .await
        .map_err(|source| CliError::Input {
            path: args.input.clone(),
            source,
        })?;
    let delay = args.delay.map(RenderDelay::from_millis).transpose()?;

    let watch_config = Arc::new(WatchConfig {
        settings: Arc::clone(&settings),
        manual: args.manual,
        delay,
    });
    let render_config = watch_config.render_config();
    info!(
        input_path = input.display().to_string(),
        output_path = output.display().to_string(),
        auto_render = render_config.auto_render,
        delay_ms = render_config.render_delay.as_millis();
        "Watching diagram"
    );

    let engine: Arc<dyn RenderEngine> = Arc::new(CommandEngine::new(config.engine.clone()));
    let controller = RenderController::builder(engine)
        .with_config(watch_config)
        .build();

    let (tx, events) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // The receiver only goes away when the preview loop has ended.
        let _ = tx.send(res);
    })
    .map_err(|source| CliError::Watch {
        path: input.clone(),
        source,
    })?;
    // Editors often replace the file instead of writing it in place, so the
    // parent directory is watched rather than the file itself.
    let watch_dir = input.parent().unwrap_or(Path::new("."));
    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|source| CliError::Watch {
            path: watch_dir.to_path_buf(),
            source,
        })?;

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Interrupted, stopping watch"),
            Err(err) => {
                warn!(err:%; "Failed to listen for Ctrl-C");
                future::pending::<()>().await;
            }
        }
    };

    let preview = PreviewLoop {
        input,
        output,
        controller,
        settings,
        preview: config.preview.clone(),
    };
    preview.run(events, spawn_stdin_reader(), shutdown).await;
    Ok(())
}

/// Forward every line typed on stdin as a manual render request.
///
/// A blocking stdin read cannot be cancelled, so it runs on a detached
/// thread that ends with the process. The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("vellum-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(_) => {
                        if tx.send(()).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(err:%; "Failed to read stdin, manual trigger disabled");
                        break;
                    }
                }
            }
        });
    if let Err(err) = spawned {
        warn!(err:%; "Failed to start stdin reader, manual trigger disabled");
    }
    rx
}

/// One live preview: the input being watched, the controller rendering it
/// and the file its settled outcomes are written to.
struct PreviewLoop {
    input: PathBuf,
    output: PathBuf,
    controller: RenderController,
    settings: Arc<SettingsManager>,
    preview: PreviewConfig,
}

impl PreviewLoop {
    /// Drive the preview until `shutdown` resolves.
    ///
    /// `events` carries file-system events, `triggers` carries manual render
    /// requests. Either channel may close without ending the loop.
    async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
        mut triggers: mpsc::UnboundedReceiver<()>,
        shutdown: impl Future<Output = ()>,
    ) {
        let mut snapshots = self.controller.subscribe();

        self.write_preview(&self.controller.snapshot()).await;
        self.reload().await;
        if self.controller.config().auto_render {
            self.controller.trigger_manual_render();
        } else {
            info!("Manual mode: press Enter to render");
        }

        let mut events_open = true;
        let mut triggers_open = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                event = events.recv(), if events_open => match event {
                    Some(Ok(event)) if touches(&event, &self.input) => self.reload().await,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => warn!(err:%; "File watcher error"),
                    None => {
                        warn!("File watcher stopped, changes are no longer picked up");
                        events_open = false;
                    }
                },
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if !snapshot.is_rendering() {
                        self.write_preview(&snapshot).await;
                    }
                }
                trigger = triggers.recv(), if triggers_open => match trigger {
                    Some(()) => {
                        let generation = self.controller.trigger_manual_render();
                        debug!(generation:%; "Manual render requested");
                    }
                    None => triggers_open = false,
                },
            }
        }

        self.controller.shutdown();
    }

    /// Feed the current file contents to the controller if they changed.
    async fn reload(&self) {
        match fs::read_to_string(&self.input).await {
            Ok(text) if text == self.controller.current_text() => {
                debug!("File touched without content change");
            }
            Ok(text) => self.controller.on_text_changed(text),
            Err(err) => warn!(
                path = self.input.display().to_string(),
                err:%;
                "Failed to read input"
            ),
        }
    }

    async fn write_preview(&self, snapshot: &RenderSnapshot) {
        let markup = preview_markup(&snapshot.outcome, self.settings.get().theme, &self.preview);
        match fs::write(&self.output, markup).await {
            Ok(()) => info!(
                generation:% = snapshot.generation,
                output_file = self.output.display().to_string();
                "Preview updated"
            ),
            Err(err) => warn!(
                output_file = self.output.display().to_string(),
                err:%;
                "Failed to write preview"
            ),
        }
    }
}

/// Returns `true` if `event` may have changed the contents of `input`.
fn touches(event: &Event, input: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|path| path == input)
}
