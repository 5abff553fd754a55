//! Engine-wide configuration.
//!
//! Each component carries its own config struct; [`EngineConfig`] bundles them
//! with the presence grace period and validates the combination once, at
//! construction time.

use core::time::Duration;

use crate::dispatcher::DispatcherConfig;
use crate::error::ConfigError;
use crate::latch::LatchConfig;
use crate::render::MAX_KERNEL;
use crate::stabilizer::StabilizerConfig;

/// Full configuration for [`crate::engine::FrameEngine`].
///
/// ```rust
/// use core::time::Duration;
/// use tutor_core::config::EngineConfig;
///
/// let mut cfg = EngineConfig::default();
/// cfg.presence_grace = Duration::from_millis(100);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Majority-vote dwell time.
    pub stabilizer: StabilizerConfig,
    /// Action-repeat suppression.
    pub dispatcher: DispatcherConfig,
    /// Lock countdown and blur range.
    pub latch: LatchConfig,
    /// How long a face may drop out before it counts as absent. Default zero.
    pub presence_grace: Duration,
}

impl EngineConfig {
    /// Check cross-field constraints.
    ///
    /// - the lock countdown is non-zero;
    /// - `1 <= min_blur <= max_blur <= 99`.
    ///
    /// Cooldowns and the grace period may be zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let latch = &self.latch;
        if latch.countdown.is_zero() {
            return Err(ConfigError::ZeroCountdown {
                countdown: latch.countdown,
            });
        }
        if latch.min_blur == 0 || latch.min_blur > latch.max_blur || latch.max_blur > MAX_KERNEL {
            return Err(ConfigError::BlurRange {
                min: latch.min_blur,
                max: latch.max_blur,
                limit: MAX_KERNEL,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.stabilizer.cooldown, Duration::from_millis(600));
        assert_eq!(cfg.dispatcher.cooldown, Duration::from_millis(700));
        assert_eq!(cfg.latch.countdown, Duration::from_millis(1_500));
        assert_eq!(cfg.presence_grace, Duration::ZERO);
    }

    #[test]
    fn test_zero_countdown_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.latch.countdown = Duration::ZERO;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroCountdown { .. })));
    }

    #[test]
    fn test_blur_range_rules() {
        let cases: &[(u8, u8, bool)] = &[
            (5, 50, true),
            (1, 99, true),
            (45, 45, true),
            (0, 50, false),
            (51, 50, false),
            (5, 100, false),
        ];
        for &(min, max, ok) in cases {
            let mut cfg = EngineConfig::default();
            cfg.latch.min_blur = min;
            cfg.latch.max_blur = max;
            assert_eq!(cfg.validate().is_ok(), ok, "min={min} max={max}");
        }
    }

    #[test]
    fn test_zero_cooldowns_allowed() {
        let mut cfg = EngineConfig::default();
        cfg.stabilizer.cooldown = Duration::ZERO;
        cfg.dispatcher.cooldown = Duration::ZERO;
        assert!(cfg.validate().is_ok());
    }
}
