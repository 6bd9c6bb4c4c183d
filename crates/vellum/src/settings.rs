//! Settings persistence and live access.
//!
//! [`SettingsManager`] owns the in-memory [`Settings`] for a session and
//! writes every change through a [`SettingsStore`]. It also implements
//! [`ConfigSource`], so a [`RenderController`](crate::RenderController) built
//! on it sees updates (auto-render toggles, delay changes) on its very next
//! trigger decision.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError, RwLock},
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use thiserror::Error;

use vellum_core::config::{ConfigSource, RenderConfig, RenderDelay};

pub use vellum_core::settings::{Settings, SettingsUpdate, Theme};

/// Settings persistence errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    #[error("Could not determine a settings directory for this platform")]
    NoSettingsDir,
}

/// Backing storage for user settings.
pub trait SettingsStore: Send + Sync {
    /// Load stored settings, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    /// Persist `settings`, replacing whatever was stored.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Remove stored settings.
    fn clear(&self) -> Result<(), SettingsError>;
}

/// Settings store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    stored: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
        }
    }

    /// The currently stored value.
    pub fn stored(&self) -> Option<Settings> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        Ok(self.stored())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(*settings);
        Ok(())
    }

    fn clear(&self) -> Result<(), SettingsError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Settings store backed by a TOML file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located in the platform data directory
    /// (for example `~/.local/share/vellum/settings.toml`).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoSettingsDir`] if no home directory can be
    /// determined.
    pub fn default_location() -> Result<Self, SettingsError> {
        let dirs = ProjectDirs::from("com", "vellum", "vellum").ok_or(SettingsError::NoSettingsDir)?;
        Ok(Self::new(dirs.data_dir().join("settings.toml")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = self.path.display().to_string(); "No stored settings");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let table: toml::Table = toml::from_str(&content).map_err(|err| SettingsError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        Ok(Some(settings_from_table(table, &self.path)))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string(settings).map_err(|err| SettingsError::Serialize(err.to_string()))?;
        fs::write(&self.path, content)?;

        debug!(path = self.path.display().to_string(); "Settings saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Build settings from a parsed settings file, one key at a time.
///
/// A key holding an unusable value keeps its default and is logged; the other
/// keys still apply.
fn settings_from_table(table: toml::Table, path: &Path) -> Settings {
    let mut settings = Settings::default();
    for (key, value) in table {
        let applied = match key.as_str() {
            "theme" => value
                .try_into::<Theme>()
                .map(|theme| settings.theme = theme),
            "auto-render" => value
                .try_into::<bool>()
                .map(|auto_render| settings.auto_render = auto_render),
            "render-delay" => value
                .try_into::<RenderDelay>()
                .map(|render_delay| settings.render_delay = render_delay),
            _ => {
                debug!(key = key.as_str(); "Ignoring unknown setting");
                continue;
            }
        };
        if let Err(err) = applied {
            warn!(
                path = path.display().to_string(),
                key = key.as_str(),
                err:%;
                "Ignoring invalid setting, using its default"
            );
        }
    }
    settings
}

/// Live user settings with write-through persistence.
pub struct SettingsManager {
    store: Box<dyn SettingsStore>,
    current: RwLock<Settings>,
}

impl SettingsManager {
    /// Load settings from `store`.
    ///
    /// Missing settings start from defaults. Unreadable settings also start
    /// from defaults; the failure is logged rather than returned so a corrupt
    /// file never blocks the editor. Stores may recover individual values, as
    /// [`FileSettingsStore`] does for a file with one bad key.
    pub fn load(store: impl SettingsStore + 'static) -> Self {
        let current = match store.load() {
            Ok(Some(settings)) => {
                info!(settings:?; "Loaded settings");
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(err:%; "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Self {
            store: Box::new(store),
            current: RwLock::new(current),
        }
    }

    /// Settings held in memory only, starting from `settings`.
    pub fn in_memory(settings: Settings) -> Self {
        Self::load(MemorySettingsStore::with_settings(settings))
    }

    /// The current settings.
    pub fn get(&self) -> Settings {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `update` and persist the result.
    ///
    /// The change takes effect in memory even if persisting fails; the
    /// persistence error is returned so the caller can report it.
    ///
    /// The write lock is held until the store returns, so concurrent updates
    /// reach the store in the same order they were applied in memory.
    pub fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = current.merged(&update);
        let updated = *current;

        debug!(settings:? = updated; "Settings updated");
        let saved = self.store.save(&updated);
        drop(current);

        saved.inspect_err(|err| {
            warn!(err:%; "Failed to save settings");
        })?;
        Ok(updated)
    }

    /// Change the theme.
    pub fn set_theme(&self, theme: Theme) -> Result<Settings, SettingsError> {
        self.update(SettingsUpdate {
            theme: Some(theme),
            ..SettingsUpdate::default()
        })
    }

    /// Switch between automatic and manual rendering.
    pub fn set_auto_render(&self, auto_render: bool) -> Result<Settings, SettingsError> {
        self.update(SettingsUpdate {
            auto_render: Some(auto_render),
            ..SettingsUpdate::default()
        })
    }

    /// Change the debounce delay for subsequently scheduled renders.
    pub fn set_render_delay(&self, render_delay: RenderDelay) -> Result<Settings, SettingsError> {
        self.update(SettingsUpdate {
            render_delay: Some(render_delay),
            ..SettingsUpdate::default()
        })
    }

    /// Restore defaults and remove the stored settings.
    pub fn reset(&self) -> Result<Settings, SettingsError> {
        let defaults = Settings::default();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = defaults;

        info!("Settings reset to defaults");
        let cleared = self.store.clear();
        drop(current);

        cleared?;
        Ok(defaults)
    }
}

impl ConfigSource for SettingsManager {
    fn render_config(&self) -> RenderConfig {
        self.get().render_config()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use tempfile::tempdir;

    use super::*;

    /// Memory store that stays observable after the manager takes it.
    struct SharedStore(Arc<MemorySettingsStore>);

    impl SettingsStore for SharedStore {
        fn load(&self) -> Result<Option<Settings>, SettingsError> {
            self.0.load()
        }

        fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
            // Give a competing update the chance to run in between.
            thread::yield_now();
            self.0.save(settings)
        }

        fn clear(&self) -> Result<(), SettingsError> {
            self.0.clear()
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl SettingsStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<Settings>, SettingsError> {
            Ok(None)
        }

        fn save(&self, _settings: &Settings) -> Result<(), SettingsError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear(&self) -> Result<(), SettingsError> {
            Ok(())
        }
    }

    fn delay(millis: u64) -> RenderDelay {
        RenderDelay::from_millis(millis).expect("valid delay")
    }

    #[test]
    fn test_defaults_when_store_empty() {
        let manager = SettingsManager::load(MemorySettingsStore::new());

        assert_eq!(manager.get(), Settings::default());
        assert!(manager.render_config().auto_render);
    }

    #[test]
    fn test_update_is_visible_through_config_source() {
        let manager = SettingsManager::in_memory(Settings::default());

        manager.set_auto_render(false).expect("memory store never fails");
        manager.set_render_delay(delay(650)).expect("memory store never fails");

        let config = manager.render_config();
        assert!(!config.auto_render);
        assert_eq!(config.render_delay.as_millis(), 650);
    }

    #[test]
    fn test_failed_save_keeps_change_in_memory() {
        let manager = SettingsManager::load(ReadOnlyStore);

        let result = manager.set_theme(Theme::Abyss);

        assert!(matches!(result, Err(SettingsError::Io(_))));
        assert_eq!(manager.get().theme, Theme::Abyss);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("nested").join("settings.toml");

        let manager = SettingsManager::load(FileSettingsStore::new(&path));
        manager
            .update(SettingsUpdate {
                theme: Some(Theme::Cyberpunk),
                auto_render: Some(false),
                render_delay: Some(delay(500)),
            })
            .expect("Failed to save settings");

        let reloaded = SettingsManager::load(FileSettingsStore::new(&path));
        assert_eq!(reloaded.get(), manager.get());
        assert_eq!(reloaded.get().render_delay.as_millis(), 500);
    }

    #[test]
    fn test_reset_clears_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("settings.toml");

        let manager = SettingsManager::load(FileSettingsStore::new(&path));
        manager.set_auto_render(false).expect("Failed to save settings");
        assert!(path.exists());

        let settings = manager.reset().expect("Failed to reset settings");

        assert_eq!(settings, Settings::default());
        assert!(!path.exists());
        assert!(manager.reset().is_ok(), "resetting twice is fine");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "theme = \"abyss").expect("Failed to write settings");

        let store = FileSettingsStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));

        let manager = SettingsManager::load(store);
        assert_eq!(manager.get(), Settings::default());
    }

    #[test]
    fn test_invalid_key_keeps_the_others() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "theme = \"abyss\"\nauto-render = false\nrender-delay = 5\nfont-size = 14\n",
        )
        .expect("Failed to write settings");

        let manager = SettingsManager::load(FileSettingsStore::new(&path));

        let settings = manager.get();
        assert_eq!(settings.theme, Theme::Abyss);
        assert!(!settings.auto_render);
        assert_eq!(settings.render_delay, RenderDelay::default());
    }

    #[test]
    fn test_concurrent_updates_persist_latest_settings() {
        let store = Arc::new(MemorySettingsStore::new());
        let manager = Arc::new(SettingsManager::load(SharedStore(Arc::clone(&store))));

        let workers: Vec<_> = (0..8u64)
            .map(|worker| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for step in 0..50u64 {
                        let millis =
                            RenderDelay::MIN_MS + (worker * 7 + step) % 19 * RenderDelay::STEP_MS;
                        manager
                            .set_render_delay(delay(millis))
                            .expect("memory store never fails");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker does not panic");
        }

        assert_eq!(store.stored(), Some(manager.get()));
    }
}
