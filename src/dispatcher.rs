/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Edge-triggered gesture dispatch.
//!
//! [`GestureDispatcher`] turns changes of the stable gesture into desktop
//! actions. It is a second debounce layer, independent of the stabiliser's
//! dwell time: the stabiliser suppresses classification noise, the dispatcher
//! suppresses action repeats.
//!
//! # Rules, in evaluation order
//!
//! 1. A fired security latch suppresses everything.
//! 2. Inside the dispatcher cooldown, the label is recorded as seen and
//!    nothing fires.
//! 3. No change from the last seen label: nothing fires.
//! 4. `OPEN_PALM` toggles `gesture_enabled` (allowed while disabled) and
//!    nothing else happens on that edge.
//! 5. With control disabled, the edge is consumed silently.
//! 6. Otherwise the label maps to at most one [`DesktopAction`].

use core::time::Duration;

use tracing::{debug, info};

use crate::labels::GestureLabel;
use crate::state::SharedState;

// ─── DesktopAction ──────────────────────────────────────────────────────────

/// A desktop-control command a gesture can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DesktopAction {
    /// Media play/pause key.
    PlayPause,
    /// Switch to the next virtual desktop.
    NextDesktop,
    /// Media volume-up key.
    VolumeUp,
}

impl DesktopAction {
    /// Action bound to `label`, if any.
    ///
    /// `OPEN_PALM` is not an action: it is the control toggle and is handled
    /// before this mapping is consulted.
    pub fn for_gesture(label: GestureLabel) -> Option<Self> {
        match label {
            GestureLabel::Fist => Some(DesktopAction::PlayPause),
            GestureLabel::Point => Some(DesktopAction::NextDesktop),
            GestureLabel::Pinch => Some(DesktopAction::VolumeUp),
            GestureLabel::OpenPalm | GestureLabel::None | GestureLabel::Unknown => None,
        }
    }

    /// Snake-case action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DesktopAction::PlayPause => "play_pause",
            DesktopAction::NextDesktop => "next_desktop",
            DesktopAction::VolumeUp => "volume_up",
        }
    }
}

// ─── ActionExecutor ─────────────────────────────────────────────────────────

/// Desktop-control capability. Implemented outside the core.
///
/// Calls are fire-and-forget; the dispatcher never inspects a result.
pub trait ActionExecutor {
    /// Toggle media playback.
    fn play_pause(&mut self);
    /// Move to the next virtual desktop.
    fn next_desktop(&mut self);
    /// Raise the system volume one step.
    fn volume_up(&mut self);
    /// Notification that gesture control was switched on or off.
    fn toggle_control(&mut self);

    /// Route `action` to the matching capability.
    fn perform(&mut self, action: DesktopAction) {
        match action {
            DesktopAction::PlayPause => self.play_pause(),
            DesktopAction::NextDesktop => self.next_desktop(),
            DesktopAction::VolumeUp => self.volume_up(),
        }
    }
}

impl<T: ActionExecutor + ?Sized> ActionExecutor for &mut T {
    fn play_pause(&mut self) {
        (**self).play_pause()
    }
    fn next_desktop(&mut self) {
        (**self).next_desktop()
    }
    fn volume_up(&mut self) {
        (**self).volume_up()
    }
    fn toggle_control(&mut self) {
        (**self).toggle_control()
    }
}

// ─── DispatcherConfig ───────────────────────────────────────────────────────

/// Tuning for [`GestureDispatcher`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatcherConfig {
    /// Minimum time between two consumed edges. Default 0.7 s.
    pub cooldown: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(700),
        }
    }
}

// ─── DispatchOutcome ────────────────────────────────────────────────────────

/// What a single [`GestureDispatcher::handle`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchOutcome {
    /// The session is locked; the label was not even recorded.
    SuppressedLocked,
    /// Inside the dispatcher cooldown; the label was recorded as seen.
    CoolingDown,
    /// Same label as last frame.
    Steady,
    /// `OPEN_PALM` edge: control flipped to `enabled`.
    Toggled {
        /// `gesture_enabled` after the flip.
        enabled: bool,
    },
    /// An edge arrived while control was disabled.
    Disabled,
    /// An edge to a label with no bound action.
    NoAction,
    /// An action was sent to the executor.
    Fired(DesktopAction),
}

impl DispatchOutcome {
    /// The action sent to the executor, if any.
    pub fn action(&self) -> Option<DesktopAction> {
        match self {
            DispatchOutcome::Fired(action) => Some(*action),
            _ => None,
        }
    }

    /// `true` if this call consumed a label transition.
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Toggled { .. }
                | DispatchOutcome::Disabled
                | DispatchOutcome::NoAction
                | DispatchOutcome::Fired(_)
        )
    }
}

// ─── GestureDispatcher ──────────────────────────────────────────────────────

/// Edge detector from stable gestures to desktop actions.
#[derive(Clone, Debug)]
pub struct GestureDispatcher {
    previous: GestureLabel,
    last_edge: Option<Duration>,
    config: DispatcherConfig,
}

impl GestureDispatcher {
    /// Dispatcher that has seen no hand yet.
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            previous: GestureLabel::None,
            last_edge: None,
            config,
        }
    }

    /// Process the stable label for the frame observed at `now`.
    ///
    /// Owns `state.gesture_enabled`; reads `state.lock_triggered`.
    pub fn handle<A: ActionExecutor>(
        &mut self,
        stable: GestureLabel,
        now: Duration,
        state: &mut SharedState,
        executor: &mut A,
    ) -> DispatchOutcome {
        if state.lock_triggered {
            return DispatchOutcome::SuppressedLocked;
        }

        if !self.cooldown_elapsed(now) {
            self.previous = stable;
            return DispatchOutcome::CoolingDown;
        }

        if stable == self.previous {
            return DispatchOutcome::Steady;
        }

        debug!(from = %self.previous, to = %stable, "gesture edge");
        self.previous = stable;
        self.last_edge = Some(now);

        if stable == GestureLabel::OpenPalm {
            state.gesture_enabled = !state.gesture_enabled;
            executor.toggle_control();
            info!(enabled = state.gesture_enabled, "gesture control toggled");
            return DispatchOutcome::Toggled {
                enabled: state.gesture_enabled,
            };
        }

        if !state.gesture_enabled {
            return DispatchOutcome::Disabled;
        }

        match DesktopAction::for_gesture(stable) {
            Some(action) => {
                info!(action = action.as_str(), gesture = %stable, "dispatching");
                executor.perform(action);
                DispatchOutcome::Fired(action)
            }
            None => DispatchOutcome::NoAction,
        }
    }

    /// Last label seen outside a lock.
    pub fn previous(&self) -> GestureLabel {
        self.previous
    }

    /// Timestamp of the last consumed edge.
    pub fn last_edge(&self) -> Option<Duration> {
        self.last_edge
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    fn cooldown_elapsed(&self, now: Duration) -> bool {
        match self.last_edge {
            Some(at) => now.saturating_sub(at) >= self.config.cooldown,
            None => true,
        }
    }
}

impl Default for GestureDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
