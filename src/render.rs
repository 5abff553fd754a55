//! Renderer contract and the small models it consumes.
//!
//! Pixels belong to the renderer. The core hands it a normalised
//! [`BlurKernel`] while the latch is obscuring the screen, and the
//! gesture/identity pair for the status overlay. [`StatusLine`] is the text
//! model of that overlay.

use core::fmt;

use crate::labels::IdentityLabel;
use crate::state::ControlStatus;

/// Largest kernel a renderer is asked to apply.
pub const MAX_KERNEL: u8 = 99;

// ─── BlurKernel ─────────────────────────────────────────────────────────────

/// Odd Gaussian kernel size in `[1, 99]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlurKernel(u8);

impl BlurKernel {
    /// Normalise a blur intensity: at least 1, forced odd, at most 99.
    pub fn from_intensity(intensity: u8) -> Self {
        BlurKernel((intensity.max(1) | 1).min(MAX_KERNEL))
    }

    /// Kernel edge length in pixels.
    pub fn size(&self) -> u8 {
        self.0
    }
}

// ─── DisplayRenderer ────────────────────────────────────────────────────────

/// Overlay and obscuring capability. Implemented outside the core.
pub trait DisplayRenderer {
    /// Whatever image type the renderer draws into.
    type Frame;

    /// Obscure `frame` with a Gaussian blur of the given kernel.
    fn apply_blur(&mut self, frame: &mut Self::Frame, kernel: BlurKernel);

    /// Draw the status overlay.
    fn render_status(&mut self, frame: &mut Self::Frame, gesture_enabled: bool, identity: IdentityLabel);
}

// ─── StatusLine ─────────────────────────────────────────────────────────────

/// Text model of the status bar, e.g. `TUTOR │ G:ON │ ID:OK │ ACTIVE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Whether gesture control is on.
    pub gesture_enabled: bool,
    /// Latest identity verdict.
    pub identity: IdentityLabel,
    /// Overall session status.
    pub status: ControlStatus,
}

impl StatusLine {
    /// Gesture segment.
    pub fn gesture_segment(&self) -> &'static str {
        if self.gesture_enabled {
            "G:ON"
        } else {
            "G:OFF"
        }
    }

    /// Identity segment. Only a verified or rejected face gets its own tag.
    pub fn identity_segment(&self) -> &'static str {
        match self.identity {
            IdentityLabel::Authorized => "ID:OK",
            IdentityLabel::Unknown => "ID:UNK",
            IdentityLabel::None | IdentityLabel::Unregistered => "ID:NONE",
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TUTOR │ {} │ {} │ {}",
            self.gesture_segment(),
            self.identity_segment(),
            self.status.as_str()
        )
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
