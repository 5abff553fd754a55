//! # Absence countdown
//!
//! Prints the blur ramp the latch produces while nobody is at the desk, the
//! kernel a renderer would apply for it, and the frame on which the lock
//! fires.
//!
//! ```bash
//! cargo run --example lock_countdown
//! ```

use core::time::Duration;

use tutor_core::error::LockError;
use tutor_core::latch::{LatchConfig, LatchPhase, LockInvoker, SecurityLatch};
use tutor_core::render::BlurKernel;
use tutor_core::state::SharedState;

struct PrintLock;

impl LockInvoker for PrintLock {
    fn lock_screen(&mut self) -> Result<(), LockError> {
        println!("  >>> lock_screen()");
        Ok(())
    }
}

fn bar(v: u8, max: u8) -> String {
    let filled = (v as usize * 30) / max as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(30 - filled))
}

fn main() {
    let config = LatchConfig::default();
    let max = config.max_blur;
    let mut latch = SecurityLatch::new(config);
    let mut state = SharedState::new();
    let mut lock = PrintLock;

    println!("Absence countdown ({:?}), blur {}..={}\n", latch.config().countdown, latch.config().min_blur, max);
    println!("  {:>6}  {:<18} {:>4} {:>6}  ramp", "t", "phase", "blur", "kernel");

    for step in 0..=20u64 {
        let now = Duration::from_millis(step * 100);
        let out = latch.evaluate(None, false, now, &mut state, &mut lock);
        let phase = match out.phase {
            LatchPhase::Monitoring => "monitoring",
            LatchPhase::AbsenceCountdown => "absence countdown",
            LatchPhase::Locked => "locked",
        };
        println!(
            "  {:>5}ms  {:<18} {:>4} {:>6}  {}",
            now.as_millis(),
            phase,
            out.blur_strength,
            BlurKernel::from_intensity(out.blur_strength).size(),
            bar(out.blur_strength, max),
        );
    }

    // Returning to the desk does not unlock.
    let out = latch.evaluate(None, true, Duration::from_secs(3), &mut state, &mut lock);
    println!("\n  face back at 3s -> phase {:?}, locked = {}", out.phase, state.lock_triggered);
}
