//! Session snapshot serialisation.

#![cfg(feature = "serde")]

mod common;

use core::time::Duration;

use common::{RecordingExecutor, RecordingLock};
use tutor_core::engine::{FrameEngine, FrameSignals};
use tutor_core::labels::{GestureLabel, IdentityLabel};
use tutor_core::latch::{LatchPhase, LockCause};
use tutor_core::snapshot::{SessionSnapshot, SNAPSHOT_VERSION};

fn run(frames: &[(FrameSignals, u64)]) -> FrameEngine {
    let mut engine: FrameEngine = FrameEngine::default();
    let mut actions = RecordingExecutor::default();
    let mut lock = RecordingLock::default();
    for (signals, at) in frames {
        engine.step(*signals, Duration::from_millis(*at), &mut actions, &mut lock);
    }
    engine
}

#[test]
fn snapshot_json_uses_wire_names() {
    let present = FrameSignals {
        gesture: GestureLabel::OpenPalm,
        face_present: true,
        identity: Some(IdentityLabel::Authorized),
    };
    let engine = run(&[(present, 0), (present, 33)]);
    let snapshot = SessionSnapshot::from_engine(&engine);

    let value: serde_json::Value = serde_json::to_value(&snapshot).expect("serialise");
    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["stable_gesture"], "OPEN_PALM");
    assert_eq!(value["state"]["identity"], "AUTHORIZED");
    assert_eq!(value["state"]["gesture_enabled"], true);
    assert_eq!(value["latch_phase"], "MONITORING");
    assert!(value["locked_by"].is_null());
}

#[test]
fn locked_snapshot_parses_back() {
    let intruder = FrameSignals {
        gesture: GestureLabel::None,
        face_present: true,
        identity: Some(IdentityLabel::Unknown),
    };
    let engine = run(&[(intruder, 0)]);
    let snapshot = SessionSnapshot::from_engine(&engine);

    let json = serde_json::to_string(&snapshot).expect("serialise");
    let back: SessionSnapshot = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back, snapshot);
    assert!(back.is_locked());
    assert_eq!(back.latch_phase, LatchPhase::Locked);
    assert_eq!(back.locked_by, Some(LockCause::UnknownIdentity));
    assert_eq!(back.state.blur_strength, 50);
}
