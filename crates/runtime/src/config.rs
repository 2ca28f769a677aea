//! Runtime configuration
//!
//! Defaults come from the game constants; each value can be overridden from
//! the environment. Unparsable values fall back to the default.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::PieceBag;
use crate::types::{LINE_CLEAR_DELAY_MS, LOCK_DELAY_MS};

/// Timing and wiring knobs for a [`GameRuntime`](crate::GameRuntime)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bag seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Permutations per bag refill: 1 is the 7-bag, 5 the 35-bag
    pub bag_copies: usize,
    pub lock_delay: Duration,
    pub line_clear_delay: Duration,
    /// JSON settings file for the console driver
    pub settings_path: Option<PathBuf>,
    /// Capacity of the command channel
    pub command_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            bag_copies: 1,
            lock_delay: Duration::from_millis(LOCK_DELAY_MS as u64),
            line_clear_delay: Duration::from_millis(LINE_CLEAR_DELAY_MS as u64),
            settings_path: None,
            command_buffer: 64,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_SEED`
    /// - `TETRIS_BAG_COPIES`
    /// - `TETRIS_LOCK_DELAY_MS`
    /// - `TETRIS_LINE_CLEAR_MS`
    /// - `TETRIS_SETTINGS_PATH`
    /// - `TETRIS_COMMAND_BUFFER`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let seed = parsed("TETRIS_SEED");
        let bag_copies = parsed("TETRIS_BAG_COPIES")
            .map(|n| n as usize)
            .unwrap_or(defaults.bag_copies)
            .max(1);
        let lock_delay = parsed("TETRIS_LOCK_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.lock_delay);
        let line_clear_delay = parsed("TETRIS_LINE_CLEAR_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.line_clear_delay);

        let settings_path = lookup("TETRIS_SETTINGS_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let command_buffer = parsed("TETRIS_COMMAND_BUFFER")
            .map(|n| n as usize)
            .unwrap_or(defaults.command_buffer)
            .max(1);

        Self {
            seed,
            bag_copies,
            lock_delay,
            line_clear_delay,
            settings_path,
            command_buffer,
        }
    }

    /// The piece bag this configuration asks for
    pub fn piece_bag(&self) -> PieceBag {
        match self.seed {
            Some(seed) => PieceBag::with_copies(seed, self.bag_copies),
            None => PieceBag::from_entropy_with_copies(self.bag_copies),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Randomizer;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.lock_delay, Duration::from_millis(500));
        assert_eq!(config.line_clear_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_BAG_COPIES", "0"),
            ("TETRIS_LOCK_DELAY_MS", "fast"),
            ("TETRIS_LINE_CLEAR_MS", " 50 "),
            ("TETRIS_SETTINGS_PATH", "  "),
            ("TETRIS_COMMAND_BUFFER", "0"),
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.bag_copies, 1);
        assert_eq!(config.lock_delay, Duration::from_millis(500));
        assert_eq!(config.line_clear_delay, Duration::from_millis(50));
        assert_eq!(config.settings_path, None);
        assert_eq!(config.command_buffer, 1);
    }

    #[test]
    fn test_bag_copies_select_the_35_bag() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TETRIS_SEED", "7"),
            ("TETRIS_BAG_COPIES", "5"),
        ]));
        assert_eq!(config.bag_copies, 5);

        let mut bag = config.piece_bag();
        assert_eq!(bag.bag_size(), 35);
        let mut counts = HashMap::new();
        for _ in 0..35 {
            *counts.entry(bag.draw()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 7);
        assert!(counts.values().all(|&n| n == 5));
    }

    #[test]
    fn test_seeded_bag_is_repeatable() {
        let config = RuntimeConfig {
            seed: Some(11),
            ..RuntimeConfig::default()
        };
        let mut a = config.piece_bag();
        let mut b = config.piece_bag();
        for _ in 0..14 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
