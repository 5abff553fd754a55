//! Error types.
//!
//! Nothing on the per-frame path is fallible. Errors exist only for
//! configuration and for reporting what the lock capability did, which the
//! latch logs and then discards.

use alloc::string::String;
use core::time::Duration;

use thiserror::Error;

/// Rejected [`crate::config::EngineConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The absence countdown must be strictly positive.
    #[error("lock countdown must be greater than zero, got {countdown:?}")]
    ZeroCountdown {
        /// Offending value.
        countdown: Duration,
    },

    /// Blur bounds outside the renderer's kernel range or inverted.
    #[error("blur range {min}..={max} is invalid: need 1 <= min <= max <= {limit}")]
    BlurRange {
        /// Configured resting blur.
        min: u8,
        /// Configured maximum blur.
        max: u8,
        /// Largest kernel a renderer accepts.
        limit: u8,
    },
}

/// Failure reported by a [`crate::latch::LockInvoker`].
///
/// Never propagated past the latch: the session counts as locked whether or
/// not the platform lock succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LockError {
    /// The platform has no known way to lock the screen.
    #[error("screen locking is not supported on this platform")]
    Unsupported,

    /// The platform lock mechanism ran and failed.
    #[error("screen lock failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::BlurRange { min: 60, max: 50, limit: 99 };
        assert_eq!(
            err.to_string(),
            "blur range 60..=50 is invalid: need 1 <= min <= max <= 99"
        );
        let err = ConfigError::ZeroCountdown { countdown: Duration::ZERO };
        assert!(err.to_string().starts_with("lock countdown must be greater than zero"));
    }

    #[test]
    fn test_lock_error_messages() {
        assert_eq!(
            LockError::Failed("xdg-screensaver exited with 1".into()).to_string(),
            "screen lock failed: xdg-screensaver exited with 1"
        );
        assert_eq!(
            LockError::Unsupported.to_string(),
            "screen locking is not supported on this platform"
        );
    }
}
