//! Python FFI bindings via PyO3.
//!
//! Exposes [`FrameEngine`](crate::engine::FrameEngine) with string labels so
//! that a Python perception loop (camera, hand and face models) can drive the
//! core. Side effects stay on the Python side: each `step` returns the
//! actions and lock request it produced and the caller performs them.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import time
//! from tutor_core import FrameEngine
//!
//! engine = FrameEngine()
//! start = time.monotonic()
//! report = engine.step("OPEN_PALM", face_present=True, identity="AUTHORIZED",
//!                      now=time.monotonic() - start)
//! for action in report.actions:      # "play_pause", "next_desktop", "volume_up"
//!     run_media_key(action)
//! if report.lock_requested:
//!     lock_screen()
//! print(report.status_line)          # TUTOR │ G:ON │ ID:OK │ ACTIVE
//! ```

use core::time::Duration;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::dispatcher::{ActionExecutor, DesktopAction};
use crate::engine::{FrameEngine, FrameReport, FrameSignals};
use crate::error::LockError;
use crate::labels::{GestureLabel, IdentityLabel};
use crate::latch::LockInvoker;

fn secs(name: &str, value: f64) -> PyResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

// ── Recorders ────────────────────────────────────────────────────────────────

/// Collects what the dispatcher asked for during one step.
#[derive(Default)]
struct ActionLog {
    actions: Vec<DesktopAction>,
    toggled: bool,
}

impl ActionExecutor for ActionLog {
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
        self.toggled = true;
    }
}

/// Records the lock request; the Python caller performs the actual lock.
#[derive(Default)]
struct LockRequest {
    requested: bool,
}

impl LockInvoker for LockRequest {
    fn lock_screen(&mut self) -> Result<(), LockError> {
        self.requested = true;
        Ok(())
    }
}

// ── StepReport ───────────────────────────────────────────────────────────────

/// Result of one `FrameEngine.step` call.
#[pyclass(name = "StepReport", get_all)]
#[derive(Clone, Debug)]
pub struct PyStepReport {
    /// Zero-based frame index.
    pub frame: u64,
    /// Stabilised gesture label.
    pub stable_gesture: String,
    /// Desktop actions to perform, in order.
    pub actions: Vec<String>,
    /// Gesture control was toggled on this frame.
    pub toggled: bool,
    /// The lock fired on this frame; the caller must lock the screen.
    pub lock_requested: bool,
    /// Gesture control on/off after this frame.
    pub gesture_enabled: bool,
    /// Identity after this frame.
    pub identity: String,
    /// Session is locked.
    pub lock_triggered: bool,
    /// Latch phase name.
    pub latch_phase: String,
    /// Blur intensity.
    pub blur_strength: u8,
    /// Odd kernel size to blur with, or None when the frame stays clear.
    pub blur_kernel: Option<u8>,
    /// Status overlay text.
    pub status_line: String,
}

impl PyStepReport {
    fn new(report: &FrameReport, log: ActionLog, lock: LockRequest) -> Self {
        Self {
            frame: report.frame,
            stable_gesture: report.stable_gesture.as_str().to_string(),
            actions: log.actions.iter().map(|a| a.as_str().to_string()).collect(),
            toggled: log.toggled,
            lock_requested: lock.requested,
            gesture_enabled: report.gesture_enabled,
            identity: report.identity.as_str().to_string(),
            lock_triggered: report.lock_triggered,
            latch_phase: report.latch.phase.as_str().to_string(),
            blur_strength: report.latch.blur_strength,
            blur_kernel: report.blur_kernel().map(|k| k.size()),
            status_line: report.status_line().to_string(),
        }
    }
}

#[pymethods]
impl PyStepReport {
    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "StepReport(frame={}, stable_gesture={}, actions={:?}, status={:?})",
            self.frame, self.stable_gesture, self.actions, self.status_line
        )
    }
}

// ── FrameEngine ──────────────────────────────────────────────────────────────

/// Per-frame gesture and security engine.
///
/// Args:
///     stabilizer_cooldown: seconds between stable-gesture changes (0.6)
///     dispatcher_cooldown: seconds between dispatch edges (0.7)
///     lock_countdown:      seconds of absence before locking (1.5)
///     presence_grace:      seconds a face may drop out unnoticed (0.0)
///     min_blur / max_blur: blur range, 1 <= min <= max <= 99 (5, 50)
#[pyclass(name = "FrameEngine")]
pub struct PyFrameEngine {
    inner: FrameEngine,
}

#[pymethods]
impl PyFrameEngine {
    /// Create an engine. Raises ValueError on an invalid configuration.
    #[new]
    #[pyo3(signature = (
        stabilizer_cooldown = 0.6,
        dispatcher_cooldown = 0.7,
        lock_countdown = 1.5,
        presence_grace = 0.0,
        min_blur = 5,
        max_blur = 50
    ))]
    pub fn new(
        stabilizer_cooldown: f64,
        dispatcher_cooldown: f64,
        lock_countdown: f64,
        presence_grace: f64,
        min_blur: u8,
        max_blur: u8,
    ) -> PyResult<Self> {
        let mut config = EngineConfig::default();
        config.stabilizer.cooldown = secs("stabilizer_cooldown", stabilizer_cooldown)?;
        config.dispatcher.cooldown = secs("dispatcher_cooldown", dispatcher_cooldown)?;
        config.latch.countdown = secs("lock_countdown", lock_countdown)?;
        config.latch.min_blur = min_blur;
        config.latch.max_blur = max_blur;
        config.presence_grace = secs("presence_grace", presence_grace)?;

        let inner = FrameEngine::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Run one frame.
    ///
    /// Args:
    ///     gesture:      raw classifier label, e.g. "FIST" or "NO_HAND"
    ///     face_present: whether a face was detected
    ///     identity:     "AUTHORIZED", "UNKNOWN", "UNREGISTERED", or None to keep the last verdict
    ///     now:          seconds since session start, monotonic
    #[pyo3(signature = (gesture, face_present, identity = None, now = 0.0))]
    pub fn step(
        &mut self,
        gesture: &str,
        face_present: bool,
        identity: Option<&str>,
        now: f64,
    ) -> PyResult<PyStepReport> {
        let signals = FrameSignals {
            gesture: GestureLabel::from_raw(gesture),
            face_present,
            identity: identity.map(IdentityLabel::from_raw),
        };
        let now = secs("now", now)?;

        let mut log = ActionLog::default();
        let mut lock = LockRequest::default();
        let report = self.inner.step(signals, now, &mut log, &mut lock);
        Ok(PyStepReport::new(&report, log, lock))
    }

    /// Gesture control on/off.
    #[getter]
    pub fn gesture_enabled(&self) -> bool {
        self.inner.state().gesture_enabled
    }

    /// Session is locked.
    #[getter]
    pub fn lock_triggered(&self) -> bool {
        self.inner.state().lock_triggered
    }

    /// Latest identity verdict.
    #[getter]
    pub fn identity(&self) -> &'static str {
        self.inner.state().identity.as_str()
    }

    /// Current stable gesture.
    #[getter]
    pub fn stable_gesture(&self) -> &'static str {
        self.inner.stabilizer().stable().as_str()
    }

    /// Frames processed.
    #[getter]
    pub fn frames(&self) -> u64 {
        self.inner.frames_processed()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let state = self.inner.state();
        format!(
            "FrameEngine(frames={}, gesture_enabled={}, identity={}, locked={})",
            self.inner.frames_processed(),
            state.gesture_enabled,
            state.identity,
            state.lock_triggered
        )
    }
}

// ── Module entry point ───────────────────────────────────────────────────────

/// Gesture control and presence-based screen locking for a webcam session.
#[pymodule]
pub fn tutor_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFrameEngine>()?;
    m.add_class::<PyStepReport>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "GESTURES",
        GestureLabel::ALL.iter().map(|g| g.as_str()).collect::<Vec<_>>(),
    )?;
    Ok(())
}
