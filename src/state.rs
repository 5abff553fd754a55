//! Session-scoped shared record.
//!
//! One [`SharedState`] exists per session. It is owned by the driver
//! ([`crate::engine::FrameEngine`]) and lent to each component in turn; there
//! is no global instance.
//!
//! # Field ownership
//!
//! | Field | Writer |
//! |---|---|
//! | `gesture_enabled` | [`crate::dispatcher::GestureDispatcher`] |
//! | `identity`, `lock_triggered`, `blur_strength` | [`crate::latch::SecurityLatch`] |
//!
//! Every component may read every field.

use crate::labels::IdentityLabel;

/// Blur strength while the session is being monitored normally.
pub const RESTING_BLUR: u8 = 5;

/// Mutable per-session record shared by the dispatcher and the latch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedState {
    /// Whether non-toggle gestures may dispatch desktop actions.
    pub gesture_enabled: bool,
    /// Most recent identity verdict.
    pub identity: IdentityLabel,
    /// Set once the latch has locked. Never cleared within a session.
    pub lock_triggered: bool,
    /// Current obscuring intensity in [5, 50] under default latch settings.
    pub blur_strength: u8,
}

impl SharedState {
    /// Fresh session: gestures disabled, no identity, unlocked, resting blur.
    pub fn new() -> Self {
        Self {
            gesture_enabled: false,
            identity: IdentityLabel::None,
            lock_triggered: false,
            blur_strength: RESTING_BLUR,
        }
    }

    /// Summary used by status overlays.
    pub fn control_status(&self) -> ControlStatus {
        ControlStatus::from_state(self)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── ControlStatus ──────────────────────────────────────────────────────────

/// Coarse session status shown in the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlStatus {
    /// Gestures dispatch desktop actions.
    Active,
    /// Gestures are ignored except the toggle.
    Idle,
    /// The security latch has fired; nothing dispatches.
    Locked,
}

impl ControlStatus {
    /// Derive the status. A fired latch outranks the enable flag.
    pub fn from_state(state: &SharedState) -> Self {
        if state.lock_triggered {
            ControlStatus::Locked
        } else if state.gesture_enabled {
            ControlStatus::Active
        } else {
            ControlStatus::Idle
        }
    }

    /// Overlay text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlStatus::Active => "ACTIVE",
            ControlStatus::Idle => "IDLE",
            ControlStatus::Locked => "LOCKED",
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
