//! Render attempt identity.
//!
//! Every render attempt is numbered by a [`Generation`] handed out by a
//! [`GenerationCounter`]. The same number serves two purposes: it makes the
//! [`RenderId`] passed to the engine unique, and it lets the controller tell
//! whether a settling attempt is still the newest one.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Monotonically increasing number identifying one render attempt.
///
/// Generation `0` is reserved for "no attempt yet"; the first attempt gets
/// generation `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any attempt was started.
    pub const NONE: Generation = Generation(0);

    /// Returns the raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is [`Generation::NONE`].
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe source of fresh [`Generation`]s.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    last: AtomicU64,
}

impl GenerationCounter {
    /// Create a counter whose first generation is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next generation.
    pub fn next(&self) -> Generation {
        Generation(self.last.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently allocated generation, or [`Generation::NONE`].
    pub fn last(&self) -> Generation {
        Generation(self.last.load(Ordering::Acquire))
    }
}

/// Identifier handed to the engine for a single render call.
///
/// Engines that embed the id into the produced markup (for example as the
/// root element id) get a value that never repeats within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderId {
    generation: Generation,
    issued_at_ms: u128,
}

impl RenderId {
    /// Create an id for `generation`, stamped with the current wall-clock time.
    pub fn new(generation: Generation) -> Self {
        let issued_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self::with_timestamp(generation, issued_at_ms)
    }

    /// Create an id with an explicit timestamp in milliseconds.
    pub fn with_timestamp(generation: Generation, issued_at_ms: u128) -> Self {
        Self {
            generation,
            issued_at_ms,
        }
    }

    /// The generation this id belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Milliseconds since the Unix epoch when the id was issued.
    pub fn issued_at_ms(&self) -> u128 {
        self.issued_at_ms
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vellum-{}-{}", self.generation.get(), self.issued_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, thread};

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_counter_starts_at_one() {
        let counter = GenerationCounter::new();
        assert!(counter.last().is_none());

        assert_eq!(counter.next().get(), 1);
        assert_eq!(counter.next().get(), 2);
        assert_eq!(counter.last().get(), 2);
    }

    #[test]
    fn test_counter_is_unique_across_threads() {
        let counter = Arc::new(GenerationCounter::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..250).map(|_| counter.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for generation in handle.join().expect("worker thread panicked") {
                assert!(seen.insert(generation), "duplicate {generation}");
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(counter.last().get(), 1000);
    }

    #[test]
    fn test_render_id_display() {
        let counter = GenerationCounter::new();
        let id = RenderId::with_timestamp(counter.next(), 1_700_000_000_123);

        assert_eq!(id.to_string(), "vellum-1-1700000000123");
    }

    proptest! {
        #[test]
        fn render_ids_differ_when_generations_differ(a in 1u64..10_000, b in 1u64..10_000, ts in any::<u64>()) {
            prop_assume!(a != b);
            let left = RenderId::with_timestamp(Generation(a), u128::from(ts));
            let right = RenderId::with_timestamp(Generation(b), u128::from(ts));
            prop_assert_ne!(left.to_string(), right.to_string());
        }
    }
}
