/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Majority-vote gesture stabiliser.
//!
//! Raw per-frame classifications flicker. [`GestureStabilizer`] keeps the `N`
//! most recent raw labels in a fixed-capacity ring and emits the label that
//! occurs most often in it, subject to a minimum dwell time between changes.
//!
//! # Invariants
//!
//! - The window holds at most `N` labels; eviction is strict FIFO.
//! - The emitted label changes at most once per `cooldown`.
//! - Ties go to the most recently pushed of the tied labels.
//! - An empty window yields the initial label, [`GestureLabel::None`].

use core::time::Duration;

use hashbrown::HashMap;
use heapless::Deque;
use tracing::debug;

use crate::labels::GestureLabel;

/// Default ring capacity.
pub const DEFAULT_WINDOW: usize = 8;

// ─── StabilizerConfig ───────────────────────────────────────────────────────

/// Tuning for [`GestureStabilizer`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StabilizerConfig {
    /// Minimum time between two changes of the emitted label. Default 0.6 s.
    pub cooldown: Duration,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(600),
        }
    }
}

// ─── GestureStabilizer ──────────────────────────────────────────────────────

/// Debounced, majority-voted view over a stream of raw gesture labels.
///
/// `N` is the window capacity and must be non-zero.
///
/// ```rust
/// use core::time::Duration;
/// use tutor_core::labels::GestureLabel;
/// use tutor_core::stabilizer::{GestureStabilizer, StabilizerConfig};
///
/// let mut stab: GestureStabilizer = GestureStabilizer::new(StabilizerConfig::default());
/// let stable = stab.push(GestureLabel::Fist, Duration::ZERO);
/// assert_eq!(stable, GestureLabel::Fist);
/// ```
#[derive(Clone, Debug)]
pub struct GestureStabilizer<const N: usize = DEFAULT_WINDOW> {
    window: Deque<GestureLabel, N>,
    stable: GestureLabel,
    last_emit: Option<Duration>,
    config: StabilizerConfig,
}

impl<const N: usize> GestureStabilizer<N> {
    const NON_EMPTY_WINDOW: () = assert!(N > 0, "stabiliser window must hold at least one label");

    /// Empty window, emitting [`GestureLabel::None`].
    pub fn new(config: StabilizerConfig) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_WINDOW;
        Self {
            window: Deque::new(),
            stable: GestureLabel::None,
            last_emit: None,
            config,
        }
    }

    /// Append a raw label observed at `now` and return the stable label.
    pub fn push(&mut self, raw: GestureLabel, now: Duration) -> GestureLabel {
        if self.window.is_full() {
            self.window.pop_front();
        }
        // Room was made above.
        let _ = self.window.push_back(raw);

        let Some(candidate) = self.majority() else {
            return self.stable;
        };

        if candidate != self.stable && self.cooldown_elapsed(now) {
            debug!(from = %self.stable, to = %candidate, "stable gesture changed");
            self.stable = candidate;
            self.last_emit = Some(now);
        }
        self.stable
    }

    /// Label with the highest count in the window, ties resolved to the most
    /// recently pushed. `None` when the window is empty.
    pub fn majority(&self) -> Option<GestureLabel> {
        let mut counts: HashMap<GestureLabel, usize> = HashMap::new();
        for label in self.window.iter() {
            *counts.entry(*label).or_insert(0) += 1;
        }
        let best = counts.values().copied().max()?;

        // Later entries overwrite earlier ones, so the newest tied label wins.
        let mut winner = None;
        for label in self.window.iter() {
            if counts.get(label) == Some(&best) {
                winner = Some(*label);
            }
        }
        winner
    }

    /// Label most recently emitted.
    pub fn stable(&self) -> GestureLabel {
        self.stable
    }

    /// Timestamp of the last emitted change, if any.
    pub fn last_emission(&self) -> Option<Duration> {
        self.last_emit
    }

    /// Number of raw labels currently held.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Window capacity (`N`).
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Raw labels in arrival order, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &GestureLabel> {
        self.window.iter()
    }

    /// Active configuration.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    fn cooldown_elapsed(&self, now: Duration) -> bool {
        match self.last_emit {
            Some(at) => now.saturating_sub(at) >= self.config.cooldown,
            None => true,
        }
    }
}

impl<const N: usize> Default for GestureStabilizer<N> {
    fn default() -> Self {
        Self::new(StabilizerConfig::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
