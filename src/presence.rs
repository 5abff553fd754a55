//! Face-presence debouncing.
//!
//! Face detectors drop single frames. [`PresenceFilter`] reports a face as
//! absent only once it has been missing continuously for `grace`. With a zero
//! grace it passes the raw flag through unchanged.

use core::time::Duration;

/// Grace-period filter over the raw face-present flag.
#[derive(Clone, Debug, Default)]
pub struct PresenceFilter {
    grace: Duration,
    missing_since: Option<Duration>,
}

impl PresenceFilter {
    /// Filter with the given grace period.
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            missing_since: None,
        }
    }

    /// Feed the raw flag observed at `now`; returns the debounced flag.
    pub fn update(&mut self, face_present: bool, now: Duration) -> bool {
        if face_present {
            self.missing_since = None;
            return true;
        }
        let since = *self.missing_since.get_or_insert(now);
        now.saturating_sub(since) < self.grace
    }

    /// How long the face has been missing, or zero if present.
    pub fn missing_for(&self, now: Duration) -> Duration {
        self.missing_since
            .map_or(Duration::ZERO, |since| now.saturating_sub(since))
    }

    /// Configured grace period.
    pub fn grace(&self) -> Duration {
        self.grace
    }
}
