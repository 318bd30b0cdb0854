//! Wheel speed commands for the differential drive

use serde::{Deserialize, Serialize};

/// Duty-cycle pair for the left and right wheel motors.
///
/// Values are normalized to `[-1, 1]` where positive is forward; the
/// constructor clamps. Conversion to PWM or velocity units is the backend's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    pub left: f32,
    pub right: f32,
}

impl WheelSpeeds {
    /// Create a speed pair, clamping both duties into `[-1, 1]`
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(-1.0, 1.0),
            right: right.clamp(-1.0, 1.0),
        }
    }

    /// Both wheels stopped
    pub fn stop() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
        }
    }

    /// True when both duties are zero
    pub fn is_stopped(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_duties() {
        let s = WheelSpeeds::new(1.7, -3.0);
        assert_eq!(s.left, 1.0);
        assert_eq!(s.right, -1.0);
    }

    #[test]
    fn test_stop() {
        assert!(WheelSpeeds::stop().is_stopped());
        assert!(!WheelSpeeds::new(0.5, 0.5).is_stopped());
    }
}
