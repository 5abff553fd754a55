//! # Scripted desk session
//!
//! Drives a `FrameEngine` through ten simulated seconds at 30 fps: the owner
//! sits down, switches gesture control on, skips a track, changes desktop,
//! raises the volume, then walks away. The screen blurs and locks.
//!
//! ```bash
//! RUST_LOG=tutor_core=debug cargo run --example session --features std
//! ```

use std::time::Duration;

use tutor_core::prelude::*;

const FRAME: Duration = Duration::from_millis(33);

// ── Scripted perception ───────────────────────────────────────────────────────

/// One stretch of the script: signals held from `from` until the next entry.
struct Beat {
    from_ms: u64,
    gesture: GestureLabel,
    face: bool,
    identity: Option<IdentityLabel>,
    note: &'static str,
}

const SCRIPT: &[Beat] = &[
    Beat { from_ms: 0,     gesture: GestureLabel::None,     face: true,  identity: Some(IdentityLabel::Authorized), note: "owner sits down" },
    Beat { from_ms: 1_000, gesture: GestureLabel::OpenPalm, face: true,  identity: None,                           note: "open palm: control on" },
    Beat { from_ms: 2_000, gesture: GestureLabel::Fist,     face: true,  identity: None,                           note: "fist: play/pause" },
    Beat { from_ms: 3_500, gesture: GestureLabel::None,     face: true,  identity: None,                           note: "hand down" },
    Beat { from_ms: 4_500, gesture: GestureLabel::Point,    face: true,  identity: None,                           note: "point: next desktop" },
    Beat { from_ms: 6_000, gesture: GestureLabel::Pinch,    face: true,  identity: None,                           note: "pinch: volume up" },
    Beat { from_ms: 7_000, gesture: GestureLabel::None,     face: false, identity: Some(IdentityLabel::None),       note: "owner walks away" },
];

/// Renders into a text line instead of pixels.
struct Frame {
    at: Duration,
    text: String,
}

struct ScriptedCamera;

impl ScriptedCamera {
    fn beat(at: Duration) -> &'static Beat {
        let ms = at.as_millis() as u64;
        SCRIPT
            .iter()
            .rev()
            .find(|b| b.from_ms <= ms)
            .unwrap_or(&SCRIPT[0])
    }
}

impl PerceptionPipeline for ScriptedCamera {
    type Frame = Frame;

    fn perceive(&mut self, frame: &mut Frame) -> FrameSignals {
        let beat = Self::beat(frame.at);
        // A flicker every 7th frame, as a real classifier would produce.
        let flicker = (frame.at.as_millis() / FRAME.as_millis()) % 7 == 3;
        FrameSignals {
            gesture: if flicker && beat.gesture.is_hand() { GestureLabel::Unknown } else { beat.gesture },
            face_present: beat.face,
            identity: beat.identity,
        }
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

struct ConsoleDesktop;

impl ActionExecutor for ConsoleDesktop {
    fn play_pause(&mut self)     { println!("      ⏯  play/pause"); }
    fn next_desktop(&mut self)   { println!("      ⇥  next desktop"); }
    fn volume_up(&mut self)      { println!("      🔊 volume up"); }
    fn toggle_control(&mut self) { println!("      ✋ control toggled"); }
}

impl LockInvoker for ConsoleDesktop {
    fn lock_screen(&mut self) -> Result<(), LockError> {
        println!("      🔒 screen locked");
        Ok(())
    }
}

struct TextRenderer;

impl DisplayRenderer for TextRenderer {
    type Frame = Frame;

    fn apply_blur(&mut self, frame: &mut Frame, kernel: BlurKernel) {
        frame.text.push_str(&format!(" blur k={:<2}", kernel.size()));
    }

    fn render_status(&mut self, frame: &mut Frame, gesture_enabled: bool, identity: IdentityLabel) {
        let g = if gesture_enabled { "ON " } else { "OFF" };
        frame.text.insert_str(0, &format!("G:{g} ID:{identity:<10}"));
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_core=debug".into()),
        )
        .init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  tutor-core scripted session: 10 simulated seconds at 30 fps        ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let clock = SessionClock::start();
    let mut engine: FrameEngine = match FrameEngine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("invalid config: {err}");
            return;
        }
    };

    let mut camera = ScriptedCamera;
    let mut desktop = ConsoleDesktop;
    let mut lock = ConsoleDesktop;
    let mut renderer = TextRenderer;
    let mut last_note = "";

    let mut now = Duration::ZERO;
    while now < Duration::from_secs(10) {
        let beat = ScriptedCamera::beat(now);
        if beat.note != last_note {
            println!("\n▶  {:>5.2}s  {}", now.as_secs_f32(), beat.note);
            last_note = beat.note;
        }

        let mut frame = Frame { at: now, text: String::new() };
        let report = engine.process_frame(
            &mut frame, now, &mut camera, &mut desktop, &mut lock, &mut renderer,
        );

        let changed = report.dispatch.is_edge() || report.latch.fired.is_some();
        let sampled = report.frame % 15 == 0;
        if changed || sampled {
            println!(
                "  #{:<4} raw={:<9} stable={:<9} {}",
                report.frame, report.signals.gesture, report.stable_gesture, frame.text
            );
        }
        if report.latch.fired.is_some() {
            println!("\n  {}", report.status_line());
            break;
        }

        now += FRAME;
    }

    println!("\n  frames processed: {}", engine.frames_processed());
    println!("  final status:     {}", engine.state().control_status().as_str());
    println!("  wall time:        {:?}", clock.now());
}
