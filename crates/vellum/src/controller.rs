//! The live render controller.
//!
//! [`RenderController`] is the stateful core shared by every editing surface.
//! It records the latest text, debounces automatic renders, starts render
//! attempts, and publishes the outcome of the newest attempt only.
//!
//! # Staleness
//!
//! Every attempt gets a fresh [`Generation`]. Starting an attempt makes its
//! generation current. When an attempt settles, its outcome is applied only
//! if its generation is still current; otherwise it was superseded and the
//! result is dropped. Engine calls are never interrupted, so a slow attempt
//! always runs to completion, but its result can never overwrite a newer one.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use log::{debug, info, trace, warn};
use tokio::sync::watch;

use vellum_core::{
    config::{ConfigSource, RenderConfig},
    engine::RenderEngine,
    error::RenderError,
    generation::{Generation, GenerationCounter, RenderId},
    outcome::RenderOutcome,
};

use crate::{
    scheduler::DebounceScheduler,
    session::RenderSession,
    templates::{self, Template},
};

/// Callback invoked with every applied (non-superseded) outcome.
///
/// Listeners run while the controller's state lock is held, which keeps
/// notifications in the same order as the outcomes were applied. A listener
/// must not call back into the controller.
pub type OutcomeListener = Arc<dyn Fn(&RenderOutcome) + Send + Sync>;

/// Published view of the controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderSnapshot {
    /// Generation of the attempt whose outcome is shown, or
    /// [`Generation::NONE`] while idle.
    pub generation: Generation,
    /// The displayed outcome.
    pub outcome: RenderOutcome,
    /// The current attempt, while it has not settled yet.
    pub pending: Option<Generation>,
}

impl RenderSnapshot {
    /// Returns `true` while the current attempt is still running.
    pub fn is_rendering(&self) -> bool {
        self.pending.is_some()
    }
}

struct State {
    text: String,
    current: Generation,
}

struct Inner {
    session: RenderSession,
    config: Arc<dyn ConfigSource>,
    scheduler: DebounceScheduler,
    generations: GenerationCounter,
    state: Mutex<State>,
    snapshots: watch::Sender<RenderSnapshot>,
    listener: Option<OutcomeListener>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `outcome` if `generation` is still the newest attempt.
    fn settle(&self, generation: Generation, outcome: RenderOutcome) {
        let state = self.lock_state();
        if generation != state.current {
            debug!(
                generation = generation.get(),
                current = state.current.get();
                "Discarding superseded render attempt"
            );
            return;
        }

        trace!(generation = generation.get(), outcome:?; "Applying render outcome");
        self.snapshots.send_replace(RenderSnapshot {
            generation,
            outcome: outcome.clone(),
            pending: None,
        });
        if let Some(listener) = &self.listener {
            listener(&outcome);
        }
        drop(state);
    }
}

/// Builder for [`RenderController`].
pub struct ControllerBuilder {
    engine: Arc<dyn RenderEngine>,
    config: Arc<dyn ConfigSource>,
    listener: Option<OutcomeListener>,
    text: String,
}

impl ControllerBuilder {
    /// Read trigger configuration from `config` instead of the defaults.
    pub fn with_config(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.config = config;
        self
    }

    /// Invoke `listener` with every applied outcome.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&RenderOutcome) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Start with `text` as the current input, without rendering it.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Build the controller.
    pub fn build(self) -> RenderController {
        let (snapshots, _) = watch::channel(RenderSnapshot::default());
        let inner = Inner {
            session: RenderSession::new(self.engine),
            config: self.config,
            scheduler: DebounceScheduler::new(),
            generations: GenerationCounter::new(),
            state: Mutex::new(State {
                text: self.text,
                current: Generation::NONE,
            }),
            snapshots,
            listener: self.listener,
        };

        RenderController {
            inner: Arc::new(inner),
        }
    }
}

/// Debounced, stale-safe render orchestration for one editing surface.
///
/// The controller is a cheap handle; clones share the same state. All
/// methods that start work must be called from within a Tokio runtime.
///
/// # Examples
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use vellum::{RenderController, engine::RenderEngine};
/// # async fn demo(engine: Arc<dyn RenderEngine>) {
/// let controller = RenderController::new(engine);
/// let mut updates = controller.subscribe();
///
/// controller.on_text_changed("graph TD;\nA-->B;");
///
/// updates.changed().await.ok();
/// println!("{:?}", updates.borrow().outcome.view());
/// # }
/// ```
#[derive(Clone)]
pub struct RenderController {
    inner: Arc<Inner>,
}

impl RenderController {
    /// Start building a controller around `engine`.
    pub fn builder(engine: Arc<dyn RenderEngine>) -> ControllerBuilder {
        ControllerBuilder {
            engine,
            config: Arc::new(RenderConfig::default()),
            listener: None,
            text: String::new(),
        }
    }

    /// Controller with default configuration: automatic rendering, 300 ms delay.
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self::builder(engine).build()
    }

    /// Record new editor text.
    ///
    /// In automatic mode this (re)arms the debounce timer; the render starts
    /// once no further change arrives for the configured delay. In manual
    /// mode nothing is rendered, and a timer left armed from automatic mode
    /// is disarmed.
    pub fn on_text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let config = self.inner.config.render_config();

        let mut state = self.inner.lock_state();
        state.text.clone_from(&text);

        if !config.auto_render {
            self.inner.scheduler.cancel();
            trace!("Automatic rendering disabled, waiting for manual trigger");
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            move || fire_debounced(&weak, text),
            config.render_delay.as_duration(),
        );
        drop(state);
    }

    /// Render the current text now, bypassing the debounce timer.
    ///
    /// A pending debounce timer is disarmed since it would render the same
    /// text again. Returns the generation of the started attempt.
    pub fn trigger_manual_render(&self) -> Generation {
        self.inner.scheduler.cancel();
        let text = self.current_text();
        info!("Manual render requested");
        self.start_attempt(text)
    }

    /// Replace the text with a starter template.
    ///
    /// Behaves exactly like typing the template's source. Returns `None` if
    /// no template has that key.
    pub fn load_template(&self, key: &str) -> Option<&'static Template> {
        let template = templates::template(key)?;
        debug!(template = template.key; "Loading template");
        self.on_text_changed(template.source);
        Some(template)
    }

    /// Start a render attempt for `text` and make it the current generation.
    ///
    /// The attempt runs on its own task. When it settles, its outcome is
    /// published only if no newer attempt was started in the meantime.
    pub fn start_attempt(&self, text: impl Into<String>) -> Generation {
        let text = text.into();

        let generation = {
            let mut state = self.inner.lock_state();
            let generation = self.inner.generations.next();
            state.current = generation;
            self.inner
                .snapshots
                .send_modify(|snapshot| snapshot.pending = Some(generation));
            generation
        };
        debug!(generation = generation.get(); "Starting render attempt");

        let inner = Arc::clone(&self.inner);
        let id = RenderId::new(generation);
        tokio::spawn(async move {
            let session = inner.session.clone();
            let attempt = tokio::spawn(async move { session.run(&id, &text).await });

            let outcome = match attempt.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(generation = generation.get(), err:%; "Render attempt aborted");
                    RenderOutcome::Failed(RenderError::Aborted)
                }
            };
            inner.settle(generation, outcome);
        });

        generation
    }

    /// The latest text recorded by [`on_text_changed`](Self::on_text_changed).
    pub fn current_text(&self) -> String {
        self.inner.lock_state().text.clone()
    }

    /// The generation of the most recently started attempt.
    pub fn current_generation(&self) -> Generation {
        self.inner.lock_state().current
    }

    /// The displayed outcome.
    pub fn outcome(&self) -> RenderOutcome {
        self.inner.snapshots.borrow().outcome.clone()
    }

    /// The full published state.
    pub fn snapshot(&self) -> RenderSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Observe published state changes.
    pub fn subscribe(&self) -> watch::Receiver<RenderSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Returns `true` while a debounced render is waiting to fire.
    pub fn is_render_scheduled(&self) -> bool {
        self.inner.scheduler.is_armed()
    }

    /// The configuration the next trigger decision will use.
    pub fn config(&self) -> RenderConfig {
        self.inner.config.render_config()
    }

    /// Disarm any pending debounced render.
    ///
    /// Attempts already running still settle and publish normally.
    pub fn shutdown(&self) {
        self.inner.scheduler.cancel();
    }
}

impl fmt::Debug for RenderController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderController")
            .field("current", &self.current_generation())
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Timer callback: start an attempt if the controller still exists.
fn fire_debounced(inner: &Weak<Inner>, text: String) {
    if let Some(inner) = inner.upgrade() {
        trace!("Debounce window elapsed");
        RenderController { inner }.start_attempt(text);
    }
}
