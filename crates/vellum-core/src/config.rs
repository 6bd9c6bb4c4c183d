//! Render configuration.
//!
//! [`RenderConfig`] is the pair of knobs the controller consults on every
//! trigger decision: whether edits render automatically, and how long the
//! debounce window is. Where those values come from is abstracted by
//! [`ConfigSource`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Debounce delay in milliseconds, constrained to `[100, 1000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RenderDelay(u64);

impl RenderDelay {
    /// Smallest accepted delay.
    pub const MIN_MS: u64 = 100;
    /// Largest accepted delay.
    pub const MAX_MS: u64 = 1000;
    /// Increment used by settings controls.
    pub const STEP_MS: u64 = 50;
    /// Delay used when nothing is configured.
    pub const DEFAULT_MS: u64 = 300;

    /// Create a delay, rejecting values outside `[MIN_MS, MAX_MS]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `millis` is out of range.
    pub fn from_millis(millis: u64) -> Result<Self, ConfigError> {
        if !(Self::MIN_MS..=Self::MAX_MS).contains(&millis) {
            return Err(ConfigError::Validation(format!(
                "render delay must be between {} and {} ms, got {millis}",
                Self::MIN_MS,
                Self::MAX_MS
            )));
        }
        Ok(Self(millis))
    }

    /// The delay in milliseconds.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// The delay as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for RenderDelay {
    fn default() -> Self {
        Self(Self::DEFAULT_MS)
    }
}

impl TryFrom<u64> for RenderDelay {
    type Error = ConfigError;

    fn try_from(millis: u64) -> Result<Self, Self::Error> {
        Self::from_millis(millis)
    }
}

impl From<RenderDelay> for u64 {
    fn from(delay: RenderDelay) -> Self {
        delay.0
    }
}

/// Trigger configuration read by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Render on every (debounced) change instead of only on request.
    pub auto_render: bool,
    /// Quiet period before an automatic render fires.
    pub render_delay: RenderDelay,
}

impl RenderConfig {
    /// Create a configuration.
    pub fn new(auto_render: bool, render_delay: RenderDelay) -> Self {
        Self {
            auto_render,
            render_delay,
        }
    }

    /// Automatic rendering with the given delay.
    pub fn automatic(render_delay: RenderDelay) -> Self {
        Self::new(true, render_delay)
    }

    /// Manual rendering; the delay is kept for when automatic mode returns.
    pub fn manual() -> Self {
        Self::new(false, RenderDelay::default())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::automatic(RenderDelay::default())
    }
}

/// Provider of the current [`RenderConfig`].
///
/// Implementations must be cheap to call; the controller reads the
/// configuration on every text change.
pub trait ConfigSource: Send + Sync {
    /// Returns the configuration in effect right now.
    fn render_config(&self) -> RenderConfig;
}

impl ConfigSource for RenderConfig {
    fn render_config(&self) -> RenderConfig {
        *self
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        delay: RenderDelay,
    }

    #[test]
    fn test_delay_bounds() {
        assert!(RenderDelay::from_millis(99).is_err());
        assert_eq!(RenderDelay::from_millis(100).map(RenderDelay::as_millis), Ok(100));
        assert_eq!(RenderDelay::from_millis(1000).map(RenderDelay::as_millis), Ok(1000));
        assert!(RenderDelay::from_millis(1001).is_err());
    }

    #[test]
    fn test_delay_deserialize_rejects_out_of_range() {
        let ok: Wrapper = toml::from_str("delay = 450").expect("valid delay");
        assert_eq!(ok.delay.as_millis(), 450);

        let err = toml::from_str::<Wrapper>("delay = 5000").unwrap_err();
        assert!(err.to_string().contains("between 100 and 1000"));
    }

    #[test]
    fn test_static_source() {
        let config = RenderConfig::manual();
        assert!(!config.render_config().auto_render);
        assert_eq!(RenderConfig::default().render_delay.as_millis(), 300);
    }
}
