//! Recording capability doubles shared by the integration tests.

#![allow(dead_code)]

use tutor_core::dispatcher::{ActionExecutor, DesktopAction};
use tutor_core::error::LockError;
use tutor_core::latch::LockInvoker;

/// Remembers every action and toggle notification, in order.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub actions: Vec<DesktopAction>,
    pub toggles: usize,
}

impl RecordingExecutor {
    pub fn count(&self, action: DesktopAction) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }
}

impl ActionExecutor for RecordingExecutor {
    fn play_pause(&mut self) {
        self.actions.push(DesktopAction::PlayPause);
    }

    fn next_desktop(&mut self) {
        self.actions.push(DesktopAction::NextDesktop);
    }

    fn volume_up(&mut self) {
        self.actions.push(DesktopAction::VolumeUp);
    }

    fn toggle_control(&mut self) {
        self.toggles += 1;
    }
}

/// Counts lock requests; optionally reports failure.
#[derive(Debug, Default)]
pub struct RecordingLock {
    pub calls: usize,
    pub fail: bool,
}

impl RecordingLock {
    pub fn failing() -> Self {
        Self { calls: 0, fail: true }
    }
}

impl LockInvoker for RecordingLock {
    fn lock_screen(&mut self) -> Result<(), LockError> {
        self.calls += 1;
        if self.fail {
            Err(LockError::Failed("no session manager".into()))
        } else {
            Ok(())
        }
    }
}
