/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Security latch with a progressive blur countdown.
//!
//! ```text
//!   MONITORING ──face lost──▶ ABSENCE_COUNTDOWN ──countdown over──▶ LOCKED
//!        ▲                          │                                 ▲
//!        └──────face back───────────┘                                 │
//!   MONITORING / ABSENCE_COUNTDOWN ────identity UNKNOWN───────────────┘
//! ```
//!
//! `LOCKED` is terminal for the session. The lock capability is best-effort:
//! its failure is logged and the transition stands.
//!
//! # Invariants
//!
//! - `lock_triggered` never returns to `false` once set.
//! - During the countdown, blur is a non-decreasing function of elapsed
//!   absence, `floor(min + progress × (max − min))`, reaching `max` at the
//!   end of the countdown.
//! - An unknown identity locks in the same pass at maximum blur.

use core::time::Duration;

use tracing::{debug, warn};

use crate::error::LockError;
use crate::labels::IdentityLabel;
use crate::state::{SharedState, RESTING_BLUR};

// ─── LockInvoker ────────────────────────────────────────────────────────────

/// Platform screen-lock capability. Implemented outside the core.
pub trait LockInvoker {
    /// Lock the workstation. May fail; the latch only logs the error.
    fn lock_screen(&mut self) -> Result<(), LockError>;
}

impl<T: LockInvoker + ?Sized> LockInvoker for &mut T {
    fn lock_screen(&mut self) -> Result<(), LockError> {
        (**self).lock_screen()
    }
}

// ─── LatchConfig ────────────────────────────────────────────────────────────

/// Countdown and blur range for [`SecurityLatch`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatchConfig {
    /// Continuous absence needed to lock. Default 1.5 s.
    pub countdown: Duration,
    /// Blur while monitoring and at countdown start. Default 5.
    pub min_blur: u8,
    /// Blur at lock time. Default 50.
    pub max_blur: u8,
}

impl Default for LatchConfig {
    fn default() -> Self {
        Self {
            countdown: Duration::from_millis(1_500),
            min_blur: RESTING_BLUR,
            max_blur: 50,
        }
    }
}

/// Blur for `elapsed` absence under `config`.
///
/// ```text
/// progress = min(elapsed / countdown, 1.0)
/// blur     = floor(min_blur + progress × (max_blur − min_blur))
/// ```
pub fn blur_strength(elapsed: Duration, config: &LatchConfig) -> u8 {
    let progress = if config.countdown.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / config.countdown.as_secs_f64()).min(1.0)
    };
    let span = f64::from(config.max_blur.saturating_sub(config.min_blur));
    // Non-negative, so truncation is floor.
    (f64::from(config.min_blur) + progress * span) as u8
}

// ─── Phase and outcome ──────────────────────────────────────────────────────

/// Where the latch is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LatchPhase {
    /// Face present and identity acceptable.
    Monitoring,
    /// Face missing; blur is ramping toward the lock.
    AbsenceCountdown,
    /// Terminal.
    Locked,
}

/// Why the latch fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LockCause {
    /// A face that does not match the enrolled identity.
    UnknownIdentity,
    /// No face for the whole countdown.
    Absence,
}

impl LatchPhase {
    /// Upper-case name as shown to operators.
    pub fn as_str(&self) -> &'static str {
        match self {
            LatchPhase::Monitoring => "MONITORING",
            LatchPhase::AbsenceCountdown => "ABSENCE_COUNTDOWN",
            LatchPhase::Locked => "LOCKED",
        }
    }
}

impl LockCause {
    /// Snake-case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockCause::UnknownIdentity => "unknown_identity",
            LockCause::Absence => "absence",
        }
    }
}

/// Result of one [`SecurityLatch::evaluate`] pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatchOutcome {
    /// Phase after this pass.
    pub phase: LatchPhase,
    /// `state.blur_strength` after this pass.
    pub blur_strength: u8,
    /// Set only on the pass that fired the lock.
    pub fired: Option<LockCause>,
}

impl LatchOutcome {
    /// `true` when the screen should be obscured this frame.
    pub fn obscures(&self) -> bool {
        !matches!(self.phase, LatchPhase::Monitoring)
    }
}

// ─── SecurityLatch ──────────────────────────────────────────────────────────

/// One-shot security latch driven by identity and presence signals.
#[derive(Clone, Debug)]
pub struct SecurityLatch {
    absence_since: Option<Duration>,
    locked_by: Option<LockCause>,
    config: LatchConfig,
}

impl SecurityLatch {
    /// Armed latch in `MONITORING`.
    pub fn new(config: LatchConfig) -> Self {
        Self {
            absence_since: None,
            locked_by: None,
            config,
        }
    }

    /// Advance the latch for the frame observed at `now`.
    ///
    /// `identity` of `None` means perception produced no verdict this frame;
    /// the previous identity is kept. Owns `state.identity`,
    /// `state.lock_triggered` and `state.blur_strength`.
    pub fn evaluate<L: LockInvoker>(
        &mut self,
        identity: Option<IdentityLabel>,
        face_present: bool,
        now: Duration,
        state: &mut SharedState,
        lock: &mut L,
    ) -> LatchOutcome {
        if let Some(identity) = identity {
            state.identity = identity;
        }

        if state.lock_triggered {
            return self.outcome(LatchPhase::Locked, state, None);
        }

        if state.identity.is_intruder() {
            state.blur_strength = self.config.max_blur;
            self.fire(LockCause::UnknownIdentity, state, lock);
            return self.outcome(LatchPhase::Locked, state, Some(LockCause::UnknownIdentity));
        }

        if !face_present {
            let since = match self.absence_since {
                Some(since) => since,
                None => {
                    debug!(at = ?now, "face absent, countdown started");
                    self.absence_since = Some(now);
                    now
                }
            };
            let elapsed = now.saturating_sub(since);
            state.blur_strength = blur_strength(elapsed, &self.config);

            if elapsed >= self.config.countdown {
                self.fire(LockCause::Absence, state, lock);
                return self.outcome(LatchPhase::Locked, state, Some(LockCause::Absence));
            }
            return self.outcome(LatchPhase::AbsenceCountdown, state, None);
        }

        if let Some(since) = self.absence_since.take() {
            debug!(absent_for = ?now.saturating_sub(since), "face back, countdown cleared");
        }
        state.blur_strength = self.config.min_blur;
        self.outcome(LatchPhase::Monitoring, state, None)
    }

    /// Current phase as seen by the latch itself.
    pub fn phase(&self) -> LatchPhase {
        if self.locked_by.is_some() {
            LatchPhase::Locked
        } else if self.absence_since.is_some() {
            LatchPhase::AbsenceCountdown
        } else {
            LatchPhase::Monitoring
        }
    }

    /// Onset of the current absence, if a countdown is running or the
    /// absence led to the lock.
    pub fn absence_since(&self) -> Option<Duration> {
        self.absence_since
    }

    /// Why the latch fired, if it has.
    pub fn locked_by(&self) -> Option<LockCause> {
        self.locked_by
    }

    /// Active configuration.
    pub fn config(&self) -> &LatchConfig {
        &self.config
    }

    fn fire<L: LockInvoker>(&mut self, cause: LockCause, state: &mut SharedState, lock: &mut L) {
        state.lock_triggered = true;
        self.locked_by = Some(cause);
        warn!(?cause, blur = state.blur_strength, "security latch fired, locking session");
        if let Err(err) = lock.lock_screen() {
            warn!(error = %err, "screen lock failed; session stays locked");
        }
    }

    fn outcome(
        &self,
        phase: LatchPhase,
        state: &SharedState,
        fired: Option<LockCause>,
    ) -> LatchOutcome {
        LatchOutcome {
            phase,
            blur_strength: state.blur_strength,
            fired,
        }
    }
}

impl Default for SecurityLatch {
    fn default() -> Self {
        Self::new(LatchConfig::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingLock {
        calls: usize,
        fail: bool,
    }

    impl LockInvoker for CountingLock {
        fn lock_screen(&mut self) -> Result<(), LockError> {
            self.calls += 1;
            if self.fail {
                Err(LockError::Unsupported)
            } else {
                Ok(())
            }
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── blur_strength ────────────────────────────────────────────────────

    #[test]
    fn test_blur_strength_endpoints() {
        let cfg = LatchConfig::default();
        assert_eq!(blur_strength(Duration::ZERO, &cfg), 5);
        assert_eq!(blur_strength(ms(1_500), &cfg), 50);
        assert_eq!(blur_strength(ms(10_000), &cfg), 50, "clamped after countdown");
    }

    #[test]
    fn test_blur_strength_midpoint() {
        let cfg = LatchConfig::default();
        // 0.75 s of 1.5 s → 5 + 22.5 → 27
        assert_eq!(blur_strength(ms(750), &cfg), 27);
    }

    #[test]
    fn test_blur_strength_is_non_decreasing() {
        let cfg = LatchConfig::default();
        let mut prev = 0;
        for t in (0..=2_000).step_by(7) {
            let b = blur_strength(ms(t), &cfg);
            assert!(b >= prev, "blur dropped at t={t}ms: {prev} -> {b}");
            prev = b;
        }
    }

    #[test]
    fn test_blur_strength_zero_countdown_is_max() {
        let cfg = LatchConfig { countdown: Duration::ZERO, ..LatchConfig::default() };
        assert_eq!(blur_strength(Duration::ZERO, &cfg), 50);
    }

    // ── transitions ──────────────────────────────────────────────────────

    #[test]
    fn test_authorized_face_stays_monitoring() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        let out = latch.evaluate(Some(IdentityLabel::Authorized), true, ms(0), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::Monitoring);
        assert_eq!(out.blur_strength, 5);
        assert!(!out.obscures());
        assert_eq!(state.identity, IdentityLabel::Authorized);
        assert_eq!(lock.calls, 0);
    }

    #[test]
    fn test_unknown_identity_locks_immediately_at_max_blur() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        let out = latch.evaluate(Some(IdentityLabel::Unknown), true, ms(0), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::Locked);
        assert_eq!(out.fired, Some(LockCause::UnknownIdentity));
        assert_eq!(state.blur_strength, 50);
        assert!(state.lock_triggered);
        assert_eq!(lock.calls, 1);
        assert_eq!(latch.phase(), LatchPhase::Locked);
    }

    #[test]
    fn test_absence_counts_down_then_locks() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        let out = latch.evaluate(None, false, ms(1_000), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::AbsenceCountdown);
        assert_eq!(out.blur_strength, 5);
        assert_eq!(latch.absence_since(), Some(ms(1_000)));

        let out = latch.evaluate(None, false, ms(1_750), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::AbsenceCountdown);
        assert_eq!(out.blur_strength, 27);
        assert!(!state.lock_triggered);

        let out = latch.evaluate(None, false, ms(2_500), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::Locked);
        assert_eq!(out.fired, Some(LockCause::Absence));
        assert_eq!(out.blur_strength, 50);
        assert!(state.lock_triggered);
        assert_eq!(lock.calls, 1);
    }

    #[test]
    fn test_face_returning_clears_countdown() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        latch.evaluate(None, false, ms(0), &mut state, &mut lock);
        latch.evaluate(None, false, ms(1_000), &mut state, &mut lock);
        assert!(state.blur_strength > 5);

        let out = latch.evaluate(Some(IdentityLabel::Authorized), true, ms(1_100), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::Monitoring);
        assert_eq!(state.blur_strength, 5);
        assert_eq!(latch.absence_since(), None);

        // A fresh absence restarts from zero.
        let out = latch.evaluate(None, false, ms(2_000), &mut state, &mut lock);
        assert_eq!(out.blur_strength, 5);
        assert_eq!(latch.absence_since(), Some(ms(2_000)));
        assert_eq!(lock.calls, 0);
    }

    #[test]
    fn test_locked_is_terminal() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        latch.evaluate(Some(IdentityLabel::Unknown), true, ms(0), &mut state, &mut lock);
        for t in 1..20 {
            let out = latch.evaluate(Some(IdentityLabel::Authorized), true, ms(t * 100), &mut state, &mut lock);
            assert_eq!(out.phase, LatchPhase::Locked);
            assert_eq!(out.fired, None);
        }
        assert!(state.lock_triggered);
        assert_eq!(state.blur_strength, 50, "blur held at lock value");
        assert_eq!(lock.calls, 1, "lock invoked exactly once");
        assert_eq!(state.identity, IdentityLabel::Authorized, "identity still tracked");
    }

    #[test]
    fn test_lock_failure_does_not_reverse_lock() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock { calls: 0, fail: true };

        let out = latch.evaluate(Some(IdentityLabel::Unknown), true, ms(0), &mut state, &mut lock);
        assert_eq!(out.phase, LatchPhase::Locked);
        assert!(state.lock_triggered);
        assert_eq!(lock.calls, 1);
    }

    #[test]
    fn test_missing_identity_retains_previous() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        latch.evaluate(Some(IdentityLabel::Unregistered), true, ms(0), &mut state, &mut lock);
        latch.evaluate(None, true, ms(33), &mut state, &mut lock);
        assert_eq!(state.identity, IdentityLabel::Unregistered);
        assert_eq!(latch.phase(), LatchPhase::Monitoring);
    }

    #[test]
    fn test_unknown_identity_preempts_running_countdown() {
        let mut latch = SecurityLatch::default();
        let mut state = SharedState::new();
        let mut lock = CountingLock::default();

        latch.evaluate(None, false, ms(0), &mut state, &mut lock);
        let out = latch.evaluate(Some(IdentityLabel::Unknown), false, ms(200), &mut state, &mut lock);
        assert_eq!(out.fired, Some(LockCause::UnknownIdentity));
        assert_eq!(out.blur_strength, 50);
    }
}
