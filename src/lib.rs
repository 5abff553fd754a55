//! # tutor-core
//!
//! Signal-to-action engine for a webcam desktop assistant: hand gestures
//! drive media and workspace actions, and face presence and identity drive a
//! screen lock.
//!
//! ---
//!
//! ## Pipeline
//!
//! ```text
//!              ┌──────────────┐  stable   ┌──────────────┐  actions
//!  raw label ─▶│  Stabilizer  │──label───▶│  Dispatcher  │──────────▶ ActionExecutor
//!              └──────────────┘           └──────┬───────┘
//!                                                │ gesture_enabled
//!                                         ┌──────▼───────┐
//!                                         │ SharedState  │◀──┐
//!                                         └──────▲───────┘   │ lock_triggered
//!  face / id ─▶ PresenceFilter ──────────▶┌──────┴───────┐   │ blur_strength
//!                                         │ SecurityLatch│───┘──────▶ LockInvoker
//!                                         └──────────────┘
//! ```
//!
//! The stabiliser turns a jittery per-frame classification into a steady
//! label: majority vote over a short window, held for a cooldown. The
//! dispatcher fires on edges of that label, with its own longer cooldown, and
//! an open palm toggles gesture control itself. The latch watches identity and
//! presence; an unrecognised face locks at once, an empty chair locks after a
//! countdown during which the screen blurs progressively. Once locked, the
//! session stays locked and every gesture is ignored.
//!
//! Everything here is synchronous and clock-free: the caller supplies one
//! monotonic `now` per frame and implements the capability traits
//! ([`ActionExecutor`](dispatcher::ActionExecutor),
//! [`LockInvoker`](latch::LockInvoker),
//! [`DisplayRenderer`](render::DisplayRenderer),
//! [`PerceptionPipeline`](engine::PerceptionPipeline)).
//!
//! ## Quick start
//!
//! ```rust
//! use core::time::Duration;
//! use tutor_core::prelude::*;
//!
//! struct Desktop;
//! impl ActionExecutor for Desktop {
//!     fn play_pause(&mut self) {}
//!     fn next_desktop(&mut self) {}
//!     fn volume_up(&mut self) {}
//!     fn toggle_control(&mut self) {}
//! }
//! impl LockInvoker for Desktop {
//!     fn lock_screen(&mut self) -> Result<(), LockError> { Ok(()) }
//! }
//!
//! let mut engine: FrameEngine = FrameEngine::new(EngineConfig::default()).unwrap();
//! let signals = FrameSignals {
//!     gesture: GestureLabel::OpenPalm,
//!     face_present: true,
//!     identity: Some(IdentityLabel::Authorized),
//! };
//! let report = engine.step(signals, Duration::ZERO, &mut Desktop, &mut Desktop);
//! assert!(report.gesture_enabled);
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`labels`] | `GestureLabel`, `IdentityLabel` |
//! | [`state`] | `SharedState`, `ControlStatus` |
//! | [`stabilizer`] | `GestureStabilizer` |
//! | [`dispatcher`] | `GestureDispatcher`, `DesktopAction`, `ActionExecutor` |
//! | [`latch`] | `SecurityLatch`, `LockInvoker`, `blur_strength` |
//! | [`presence`] | `PresenceFilter` |
//! | [`render`] | `BlurKernel`, `StatusLine`, `DisplayRenderer` |
//! | [`engine`] | `FrameEngine`, `FrameSignals`, `FrameReport` |
//! | [`config`] | `EngineConfig` |
//! | [`error`] | `ConfigError`, `LockError` |
//! | `snapshot` | `SessionSnapshot` (feature `serde`) |
//! | `ffi` | PyO3 bindings (feature `python-ffi`) |
//!
//! ## Features
//!
//! - `std`: `SessionClock`, std support in `tracing` and `thiserror`.
//! - `serde`: derives on public data types, plus the `snapshot` module.
//! - `python-ffi`: PyO3 extension module (implies `std`).
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod labels;
pub mod latch;
pub mod presence;
pub mod render;
pub mod stabilizer;
pub mod state;

#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

/// Common imports for driving an engine.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::dispatcher::{ActionExecutor, DesktopAction, DispatchOutcome};
    pub use crate::engine::{FrameEngine, FrameReport, FrameSignals, PerceptionPipeline};
    pub use crate::error::{ConfigError, LockError};
    pub use crate::labels::{GestureLabel, IdentityLabel};
    pub use crate::latch::{LatchPhase, LockCause, LockInvoker};
    pub use crate::render::{BlurKernel, DisplayRenderer, StatusLine};
    pub use crate::state::{ControlStatus, SharedState};

    #[cfg(feature = "std")]
    pub use crate::engine::SessionClock;
}
