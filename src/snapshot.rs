//! Serialisable snapshot of a running session.
//!
//! A [`SessionSnapshot`] captures what an observer needs to see about a
//! [`FrameEngine`]: the stabiliser window, the shared state and the latch.
//! It is observational. Nothing restores an engine from one, so a snapshot
//! can never be used to clear a lock.
//!
//! Requires the `serde` feature. Uses `alloc::vec::Vec` and works on
//! no_std + alloc targets.
//!
//! [`FrameEngine`]: crate::engine::FrameEngine

use alloc::vec::Vec;
use core::time::Duration;

use crate::engine::FrameEngine;
use crate::labels::{GestureLabel, IdentityLabel};
use crate::latch::{LatchPhase, LockCause};
use crate::state::SharedState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Point-in-time view of a [`FrameEngine`].
///
/// # Example
///
/// ```rust,ignore
/// use tutor_core::engine::FrameEngine;
/// use tutor_core::snapshot::SessionSnapshot;
///
/// let engine: FrameEngine = FrameEngine::default();
/// let snapshot = SessionSnapshot::from_engine(&engine);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Always [`SNAPSHOT_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Passes completed.
    pub frames: u64,
    /// Raw labels in the stabiliser window, oldest first.
    pub window: Vec<GestureLabel>,
    /// Current stable gesture.
    pub stable_gesture: GestureLabel,
    /// Shared session state.
    pub state: StateRecord,
    /// Latch phase.
    pub latch_phase: LatchPhase,
    /// Start of the running absence timer.
    pub absence_since: Option<Duration>,
    /// What fired the latch, once locked.
    pub locked_by: Option<LockCause>,
}

/// Serialisable copy of [`SharedState`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateRecord {
    /// Gesture control on/off.
    pub gesture_enabled: bool,
    /// Latest identity verdict.
    pub identity: IdentityLabel,
    /// Latch has fired.
    pub lock_triggered: bool,
    /// Current blur intensity.
    pub blur_strength: u8,
}

impl From<&SharedState> for StateRecord {
    fn from(s: &SharedState) -> Self {
        Self {
            gesture_enabled: s.gesture_enabled,
            identity: s.identity,
            lock_triggered: s.lock_triggered,
            blur_strength: s.blur_strength,
        }
    }
}

impl SessionSnapshot {
    /// Capture `engine` as it stands between passes.
    pub fn from_engine<const N: usize>(engine: &FrameEngine<N>) -> Self {
        let latch = engine.latch();
        Self {
            version: SNAPSHOT_VERSION,
            frames: engine.frames_processed(),
            window: engine.stabilizer().window().copied().collect(),
            stable_gesture: engine.stabilizer().stable(),
            state: StateRecord::from(engine.state()),
            latch_phase: latch.phase(),
            absence_since: latch.absence_since(),
            locked_by: latch.locked_by(),
        }
    }

    /// Whether this snapshot shows a locked session.
    pub fn is_locked(&self) -> bool {
        self.state.lock_triggered
    }
}
