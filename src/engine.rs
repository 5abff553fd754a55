//! The per-frame driver.
//!
//! [`FrameEngine`] owns the session's [`SharedState`] and the three stateful
//! components and runs one pass per camera frame:
//!
//! ```text
//! perception ─▶ stabiliser ─▶ dispatcher ─▶ presence filter ─▶ latch ─▶ renderer
//! ```
//!
//! A pass runs to completion before the next begins. Time is a single
//! monotonic reading taken by the caller at the start of the pass; no
//! component schedules anything on its own.

use core::time::Duration;

use tracing::trace;

use crate::config::EngineConfig;
use crate::dispatcher::{ActionExecutor, DispatchOutcome, GestureDispatcher};
use crate::error::ConfigError;
use crate::labels::{GestureLabel, IdentityLabel};
use crate::latch::{LatchOutcome, LockInvoker, SecurityLatch};
use crate::presence::PresenceFilter;
use crate::render::{BlurKernel, DisplayRenderer, StatusLine};
use crate::stabilizer::{GestureStabilizer, DEFAULT_WINDOW};
use crate::state::{ControlStatus, SharedState};

// ─── Inputs ─────────────────────────────────────────────────────────────────

/// Everything perception reports about one frame.
///
/// The default value is the fail-soft signal: no hand, no face, identity
/// unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameSignals {
    /// Raw, unstabilised gesture classification.
    pub gesture: GestureLabel,
    /// Whether a face was detected.
    pub face_present: bool,
    /// Identity verdict; `None` keeps the previous one.
    pub identity: Option<IdentityLabel>,
}

/// Source of [`FrameSignals`]. Implemented outside the core.
///
/// Implementations swallow their own failures and report the default
/// signals instead.
pub trait PerceptionPipeline {
    /// Image type the pipeline reads (and may annotate).
    type Frame;

    /// Classify one frame.
    fn perceive(&mut self, frame: &mut Self::Frame) -> FrameSignals;
}

// ─── FrameReport ────────────────────────────────────────────────────────────

/// What one pass observed and did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Zero-based index of this pass.
    pub frame: u64,
    /// Signals as received.
    pub signals: FrameSignals,
    /// Stabiliser output.
    pub stable_gesture: GestureLabel,
    /// Dispatcher decision.
    pub dispatch: DispatchOutcome,
    /// Face presence after the grace filter.
    pub face_present: bool,
    /// Latch decision.
    pub latch: LatchOutcome,
    /// `SharedState::gesture_enabled` at the end of the pass.
    pub gesture_enabled: bool,
    /// `SharedState::identity` at the end of the pass.
    pub identity: IdentityLabel,
    /// `SharedState::lock_triggered` at the end of the pass.
    pub lock_triggered: bool,
}

impl FrameReport {
    /// Kernel to obscure the frame with, while the latch is counting down or
    /// locked.
    pub fn blur_kernel(&self) -> Option<BlurKernel> {
        self.latch
            .obscures()
            .then(|| BlurKernel::from_intensity(self.latch.blur_strength))
    }

    /// Overlay text model.
    pub fn status_line(&self) -> StatusLine {
        let status = if self.lock_triggered {
            ControlStatus::Locked
        } else if self.gesture_enabled {
            ControlStatus::Active
        } else {
            ControlStatus::Idle
        };
        StatusLine {
            gesture_enabled: self.gesture_enabled,
            identity: self.identity,
            status,
        }
    }

    /// Blur (if any) then draw the status overlay.
    pub fn render<R: DisplayRenderer>(&self, renderer: &mut R, frame: &mut R::Frame) {
        if let Some(kernel) = self.blur_kernel() {
            renderer.apply_blur(frame, kernel);
        }
        renderer.render_status(frame, self.gesture_enabled, self.identity);
    }
}

// ─── FrameEngine ────────────────────────────────────────────────────────────

/// Owns the session state and drives every component once per frame.
///
/// `N` is the stabiliser window.
#[derive(Clone, Debug)]
pub struct FrameEngine<const N: usize = DEFAULT_WINDOW> {
    state: SharedState,
    stabilizer: GestureStabilizer<N>,
    dispatcher: GestureDispatcher,
    presence: PresenceFilter,
    latch: SecurityLatch,
    frames: u64,
}

impl<const N: usize> FrameEngine<N> {
    /// Validate `config` and build a fresh session.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: EngineConfig) -> Self {
        Self {
            state: SharedState::new(),
            stabilizer: GestureStabilizer::new(config.stabilizer),
            dispatcher: GestureDispatcher::new(config.dispatcher),
            presence: PresenceFilter::new(config.presence_grace),
            latch: SecurityLatch::new(config.latch),
            frames: 0,
        }
    }

    /// Run one pass over already-perceived signals.
    pub fn step<A, L>(
        &mut self,
        signals: FrameSignals,
        now: Duration,
        actions: &mut A,
        lock: &mut L,
    ) -> FrameReport
    where
        A: ActionExecutor,
        L: LockInvoker,
    {
        let stable_gesture = self.stabilizer.push(signals.gesture, now);
        let dispatch = self
            .dispatcher
            .handle(stable_gesture, now, &mut self.state, actions);
        let face_present = self.presence.update(signals.face_present, now);
        let latch = self
            .latch
            .evaluate(signals.identity, face_present, now, &mut self.state, lock);

        let report = FrameReport {
            frame: self.frames,
            signals,
            stable_gesture,
            dispatch,
            face_present,
            latch,
            gesture_enabled: self.state.gesture_enabled,
            identity: self.state.identity,
            lock_triggered: self.state.lock_triggered,
        };
        self.frames += 1;

        trace!(
            frame = report.frame,
            raw = %signals.gesture,
            stable = %stable_gesture,
            dispatch = ?dispatch,
            phase = ?latch.phase,
            blur = latch.blur_strength,
            "pass complete"
        );
        report
    }

    /// Full pass: perceive, step, then render.
    pub fn process_frame<P, R, A, L>(
        &mut self,
        frame: &mut R::Frame,
        now: Duration,
        perception: &mut P,
        actions: &mut A,
        lock: &mut L,
        renderer: &mut R,
    ) -> FrameReport
    where
        P: PerceptionPipeline<Frame = R::Frame>,
        R: DisplayRenderer,
        A: ActionExecutor,
        L: LockInvoker,
    {
        let signals = perception.perceive(frame);
        let report = self.step(signals, now, actions, lock);
        report.render(renderer, frame);
        report
    }

    /// Session state.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Gesture stabiliser.
    pub fn stabilizer(&self) -> &GestureStabilizer<N> {
        &self.stabilizer
    }

    /// Gesture dispatcher.
    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    /// Security latch.
    pub fn latch(&self) -> &SecurityLatch {
        &self.latch
    }

    /// Passes completed so far.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}

impl<const N: usize> Default for FrameEngine<N> {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

// ─── SessionClock ───────────────────────────────────────────────────────────

/// Monotonic clock measured from session start.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SessionClock {
    /// Start the clock now.
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Time since [`SessionClock::start`].
    pub fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::DesktopAction;
    use crate::error::LockError;
    use crate::latch::LatchPhase;

    #[derive(Default)]
    struct Sink {
        actions: Vec<DesktopAction>,
        toggles: usize,
        locks: usize,
    }

    impl ActionExecutor for Sink {
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

    impl LockInvoker for Sink {
        fn lock_screen(&mut self) -> Result<(), LockError> {
            self.locks += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Canvas {
        blurs: Vec<u8>,
        statuses: Vec<(bool, IdentityLabel)>,
    }

    struct CanvasRenderer;

    impl DisplayRenderer for CanvasRenderer {
        type Frame = Canvas;

        fn apply_blur(&mut self, frame: &mut Canvas, kernel: BlurKernel) {
            frame.blurs.push(kernel.size());
        }

        fn render_status(&mut self, frame: &mut Canvas, gesture_enabled: bool, identity: IdentityLabel) {
            frame.statuses.push((gesture_enabled, identity));
        }
    }

    struct Scripted(FrameSignals);

    impl PerceptionPipeline for Scripted {
        type Frame = Canvas;

        fn perceive(&mut self, _frame: &mut Canvas) -> FrameSignals {
            self.0
        }
    }

    fn present(gesture: GestureLabel) -> FrameSignals {
        FrameSignals {
            gesture,
            face_present: true,
            identity: Some(IdentityLabel::Authorized),
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Two separate sinks so the same value is not borrowed twice.
    fn step(engine: &mut FrameEngine, signals: FrameSignals, now: Duration, io: &mut (Sink, Sink)) -> FrameReport {
        let (actions, lock) = io;
        engine.step(signals, now, actions, lock)
    }

    #[test]
    fn test_fail_soft_default_signals() {
        let s = FrameSignals::default();
        assert_eq!(s.gesture, GestureLabel::None);
        assert!(!s.face_present);
        assert_eq!(s.identity, None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut cfg = EngineConfig::default();
        cfg.latch.max_blur = 0;
        let result: Result<FrameEngine, _> = FrameEngine::new(cfg);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_counter_and_report() {
        let mut engine: FrameEngine = FrameEngine::default();
        let mut io = (Sink::default(), Sink::default());

        let r0 = step(&mut engine, present(GestureLabel::None), ms(0), &mut io);
        let r1 = step(&mut engine, present(GestureLabel::None), ms(33), &mut io);
        assert_eq!(r0.frame, 0);
        assert_eq!(r1.frame, 1);
        assert_eq!(engine.frames_processed(), 2);
        assert_eq!(r1.identity, IdentityLabel::Authorized);
        assert_eq!(r1.latch.phase, LatchPhase::Monitoring);
        assert_eq!(r1.blur_kernel(), None);
        assert_eq!(r1.status_line().to_string(), "TUTOR │ G:OFF │ ID:OK │ IDLE");
    }

    #[test]
    fn test_toggle_then_action_through_engine() {
        let mut engine: FrameEngine = FrameEngine::default();
        let mut io = (Sink::default(), Sink::default());

        let mut t = 0;
        for _ in 0..8 {
            step(&mut engine, present(GestureLabel::OpenPalm), ms(t), &mut io);
            t += 33;
        }
        assert!(engine.state().gesture_enabled);
        assert_eq!(io.0.toggles, 1);

        t += 1_000;
        for _ in 0..8 {
            step(&mut engine, present(GestureLabel::Fist), ms(t), &mut io);
            t += 100;
        }
        assert_eq!(io.0.actions, vec![DesktopAction::PlayPause]);
    }

    #[test]
    fn test_lock_blocks_dispatch_on_following_frames() {
        let mut engine: FrameEngine = FrameEngine::default();
        let mut io = (Sink::default(), Sink::default());

        let intruder = FrameSignals {
            gesture: GestureLabel::OpenPalm,
            face_present: true,
            identity: Some(IdentityLabel::Unknown),
        };
        // Dispatch runs before the latch, so this first frame still toggles.
        let r = step(&mut engine, intruder, ms(0), &mut io);
        assert!(r.lock_triggered);
        assert_eq!(io.1.locks, 1);

        let r = step(&mut engine, present(GestureLabel::Fist), ms(5_000), &mut io);
        assert_eq!(r.dispatch, DispatchOutcome::SuppressedLocked);
        assert!(io.0.actions.is_empty());
        assert_eq!(r.status_line().status, ControlStatus::Locked);
    }

    #[test]
    fn test_process_frame_renders_blur_then_status() {
        let mut engine: FrameEngine = FrameEngine::default();
        let mut sink = Sink::default();
        let mut lock = Sink::default();
        let mut renderer = CanvasRenderer;
        let mut canvas = Canvas::default();

        let mut absent = Scripted(FrameSignals::default());
        engine.process_frame(&mut canvas, ms(0), &mut absent, &mut sink, &mut lock, &mut renderer);
        let report = engine.process_frame(&mut canvas, ms(1_500), &mut absent, &mut sink, &mut lock, &mut renderer);

        assert!(report.lock_triggered);
        assert_eq!(canvas.blurs, vec![5, 51]);
        assert_eq!(canvas.statuses.len(), 2);

        let mut back = Scripted(present(GestureLabel::None));
        engine.process_frame(&mut canvas, ms(2_000), &mut back, &mut sink, &mut lock, &mut renderer);
        assert_eq!(canvas.blurs.len(), 3, "locked frames stay obscured");
    }

    #[test]
    fn test_presence_grace_delays_countdown() {
        let cfg = EngineConfig {
            presence_grace: ms(100),
            ..EngineConfig::default()
        };
        let mut engine: FrameEngine = FrameEngine::new(cfg).expect("valid config");
        let mut io = (Sink::default(), Sink::default());

        let r = step(&mut engine, FrameSignals::default(), ms(0), &mut io);
        assert!(r.face_present);
        assert_eq!(r.latch.phase, LatchPhase::Monitoring);

        let r = step(&mut engine, FrameSignals::default(), ms(100), &mut io);
        assert!(!r.face_present);
        assert_eq!(r.latch.phase, LatchPhase::AbsenceCountdown);
        assert_eq!(engine.latch().absence_since(), Some(ms(100)));
    }
}
