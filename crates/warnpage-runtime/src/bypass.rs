#![forbid(unsafe_code)]

//! Bypass-sequence detector.
//!
//! A fixed phrase typed anywhere on the page dismisses the warning. The
//! phrase is kept base64-encoded in configuration and decoded once into a
//! sequence of key codes.
//!
//! # Design
//!
//! The detector is a finite-state machine with `len + 1` states: the cursor
//! into the phrase. Each keystroke either advances the cursor or resets it
//! to zero. Reaching the end fires once and returns to the start state.
//!
//! ## Invariants
//! 1. The cursor is always in `0..len` between calls.
//! 2. A mismatched key resets the cursor and is *not* retried against the
//!    first position, so overlapping prefixes are not recognized.
//! 3. Feeding the full phrase `n` times back to back fires exactly `n` times.
//!
//! # Example
//!
//! ```
//! use warnpage_runtime::bypass::{BypassConfig, BypassDetector};
//!
//! let mut detector = BypassDetector::new(&BypassConfig::default()).unwrap();
//! let fired = "thisisunsafe".chars().filter(|&c| detector.on_key(c as u32)).count();
//! assert_eq!(fired, 1);
//! assert_eq!(detector.cursor(), 0);
//! ```

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Base64 encoding of the default bypass phrase.
pub const DEFAULT_ENCODED_SEQUENCE: &str = "dGhpc2lzdW5zYWZl";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the bypass detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassConfig {
    /// Base64-encoded phrase (standard alphabet, padded).
    pub encoded_sequence: String,

    /// Whether keystrokes are matched at all (default: true).
    pub enabled: bool,
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self {
            encoded_sequence: DEFAULT_ENCODED_SEQUENCE.to_string(),
            enabled: true,
        }
    }
}

impl BypassConfig {
    /// Use a different encoded phrase.
    #[must_use]
    pub fn with_encoded_sequence(mut self, encoded: impl Into<String>) -> Self {
        self.encoded_sequence = encoded.into();
        self
    }

    /// Enable or disable matching.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The encoded phrase could not be turned into key codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassConfigError {
    /// Not valid base64.
    Decode(base64::DecodeError),
    /// Decodes to an empty phrase.
    Empty,
}

impl fmt::Display for BypassConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "bypass sequence is not valid base64: {e}"),
            Self::Empty => write!(f, "bypass sequence is empty"),
        }
    }
}

impl std::error::Error for BypassConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Empty => None,
        }
    }
}

impl From<base64::DecodeError> for BypassConfigError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// BypassAction
// ---------------------------------------------------------------------------

/// Result of feeding one keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassAction {
    /// The key matched; `progress` keys of the phrase have been seen.
    Advanced { progress: usize },
    /// The key did not match; progress was discarded.
    Reset,
    /// The key completed the phrase. The caller should proceed.
    Fired,
    /// Matching is disabled.
    Ignored,
}

impl BypassAction {
    #[must_use]
    pub const fn is_fired(&self) -> bool {
        matches!(self, Self::Fired)
    }
}

// ---------------------------------------------------------------------------
// BypassDetector
// ---------------------------------------------------------------------------

/// Incremental matcher for the bypass phrase.
pub struct BypassDetector {
    sequence: Vec<u32>,
    cursor: usize,
    enabled: bool,
}

impl fmt::Debug for BypassDetector {
    // The phrase itself stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BypassDetector")
            .field("len", &self.sequence.len())
            .field("cursor", &self.cursor)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl BypassDetector {
    /// Decode the configured phrase and build a detector at the start state.
    pub fn new(config: &BypassConfig) -> Result<Self, BypassConfigError> {
        let bytes = STANDARD.decode(config.encoded_sequence.as_bytes())?;
        if bytes.is_empty() {
            return Err(BypassConfigError::Empty);
        }
        Ok(Self {
            sequence: bytes.into_iter().map(u32::from).collect(),
            cursor: 0,
            enabled: config.enabled,
        })
    }

    /// Feed one keystroke by key code.
    pub fn feed(&mut self, code: u32) -> BypassAction {
        if !self.enabled {
            return BypassAction::Ignored;
        }
        if self.sequence.get(self.cursor) != Some(&code) {
            if self.cursor > 0 {
                tracing::trace!(progress = self.cursor, "bypass sequence reset");
            }
            self.cursor = 0;
            return BypassAction::Reset;
        }

        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            self.cursor = 0;
            tracing::info!("bypass sequence completed");
            BypassAction::Fired
        } else {
            BypassAction::Advanced {
                progress: self.cursor,
            }
        }
    }

    /// Feed one keystroke; returns whether the phrase was completed.
    pub fn on_key(&mut self, code: u32) -> bool {
        self.feed(code).is_fired()
    }

    /// Number of phrase keys matched so far.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the phrase in keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always `false`: construction rejects empty phrases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Discard any progress.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PHRASE: &str = "thisisunsafe";

    fn detector() -> BypassDetector {
        BypassDetector::new(&BypassConfig::default()).unwrap()
    }

    fn codes(s: &str) -> Vec<u32> {
        s.chars().map(u32::from).collect()
    }

    fn count_fired(d: &mut BypassDetector, keys: &[u32]) -> usize {
        keys.iter().filter(|&&k| d.on_key(k)).count()
    }

    #[test]
    fn default_sequence_decodes_to_phrase() {
        let d = detector();
        assert_eq!(d.len(), PHRASE.len());
        assert_eq!(d.sequence, codes(PHRASE));
    }

    #[test]
    fn exact_phrase_fires_once() {
        let mut d = detector();
        assert_eq!(count_fired(&mut d, &codes(PHRASE)), 1);
        assert_eq!(d.cursor(), 0);
    }

    #[test]
    fn fires_only_on_last_key() {
        let mut d = detector();
        let keys = codes(PHRASE);
        for (i, &k) in keys.iter().enumerate() {
            let action = d.feed(k);
            if i + 1 == keys.len() {
                assert_eq!(action, BypassAction::Fired);
            } else {
                assert_eq!(action, BypassAction::Advanced { progress: i + 1 });
            }
        }
    }

    #[test]
    fn phrase_twice_fires_twice() {
        let mut d = detector();
        let keys = codes(&PHRASE.repeat(2));
        assert_eq!(count_fired(&mut d, &keys), 2);
    }

    #[test]
    fn wrong_key_resets_progress() {
        let mut d = detector();
        for k in codes("thisis") {
            d.on_key(k);
        }
        assert_eq!(d.cursor(), 6);
        assert_eq!(d.feed(u32::from('x')), BypassAction::Reset);
        assert_eq!(d.cursor(), 0);
        assert_eq!(count_fired(&mut d, &codes("unsafe")), 0);
    }

    #[test]
    fn mismatched_key_is_not_retried_at_start() {
        let mut d = detector();
        // "tt": second 't' mismatches position 1 ('h') and resets without
        // counting as a fresh start.
        d.on_key(u32::from('t'));
        assert_eq!(d.feed(u32::from('t')), BypassAction::Reset);
        assert_eq!(d.cursor(), 0);
        assert_eq!(count_fired(&mut d, &codes("hisisunsafe")), 0);
    }

    #[test]
    fn overlapping_prefix_is_not_recovered() {
        // The 't' that breaks the almost-complete phrase would have to be
        // retried as a fresh start for the phrase to be recognized.
        let mut d = detector();
        let keys = codes(&format!("thisisunsaf{PHRASE}"));
        assert_eq!(count_fired(&mut d, &keys), 0);

        let mut d = detector();
        let keys = codes(&format!("thisisunsafx{PHRASE}"));
        assert_eq!(count_fired(&mut d, &keys), 1);
    }

    #[test]
    fn disabled_detector_ignores_keys() {
        let mut d = BypassDetector::new(&BypassConfig::default().enabled(false)).unwrap();
        assert!(!d.is_enabled());
        for k in codes(PHRASE) {
            assert_eq!(d.feed(k), BypassAction::Ignored);
        }
    }

    #[test]
    fn custom_encoded_sequence() {
        // "abc"
        let config = BypassConfig::default().with_encoded_sequence("YWJj");
        let mut d = BypassDetector::new(&config).unwrap();
        assert_eq!(count_fired(&mut d, &codes("abc")), 1);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let config = BypassConfig::default().with_encoded_sequence("not base64!");
        assert!(matches!(
            BypassDetector::new(&config),
            Err(BypassConfigError::Decode(_))
        ));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let config = BypassConfig::default().with_encoded_sequence("");
        assert_eq!(
            BypassDetector::new(&config).unwrap_err(),
            BypassConfigError::Empty
        );
    }

    #[test]
    fn phrase_is_only_taken_from_its_encoding() {
        // The plaintext happens to be valid base64 and decodes to other bytes.
        let config = BypassConfig::default().with_encoded_sequence(PHRASE);
        let mut d = BypassDetector::new(&config).unwrap();
        assert_ne!(d.sequence, codes(PHRASE));
        assert_eq!(count_fired(&mut d, &codes(PHRASE)), 0);
    }

    #[test]
    fn reset_discards_progress() {
        let mut d = detector();
        d.on_key(u32::from('t'));
        d.reset();
        assert_eq!(d.cursor(), 0);
    }

    #[test]
    fn debug_does_not_leak_phrase() {
        let dbg = format!("{:?}", detector());
        assert!(dbg.contains("BypassDetector"));
        assert!(!dbg.contains("116"));
    }

    #[tracing_test::traced_test]
    #[test]
    fn completion_is_logged() {
        let mut d = detector();
        count_fired(&mut d, &codes(PHRASE));
        assert!(logs_contain("bypass sequence completed"));
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(keys in prop::collection::vec(0u32..256, 0..64)) {
            let mut d = detector();
            for k in keys {
                d.feed(k);
                prop_assert!(d.cursor() < d.len());
            }
        }

        #[test]
        fn one_wrong_key_prevents_firing(pos in 0usize..12, wrong in 0u32..256) {
            let mut keys = codes(PHRASE);
            prop_assume!(keys[pos] != wrong);
            keys[pos] = wrong;
            let mut d = detector();
            prop_assert_eq!(count_fired(&mut d, &keys), 0);
        }

        #[test]
        fn repeated_phrase_fires_per_repeat(n in 1usize..6) {
            let mut d = detector();
            prop_assert_eq!(count_fired(&mut d, &codes(&PHRASE.repeat(n))), n);
        }
    }
}
