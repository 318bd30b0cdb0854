//! RGBA color values for the LED drivers

use serde::{Deserialize, Serialize};

/// RGBA color with each channel in `[0, 1]`.
///
/// Constructors clamp out-of-range channels rather than erroring, matching
/// the tolerant behavior expected by actuator drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RgbaColor {
    /// All channels zero (LED off)
    pub const OFF: RgbaColor = RgbaColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Amber at full intensity, the signal color used by the demos
    pub const AMBER: RgbaColor = RgbaColor {
        r: 1.0,
        g: 0.7,
        b: 0.0,
        a: 1.0,
    };

    /// Create a color, clamping each channel into `[0, 1]`
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// True if every channel is within `[0, 1]`
    pub fn is_normalized(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_channels() {
        let c = RgbaColor::new(1.5, -0.2, 0.7, 2.0);
        assert_eq!(c, RgbaColor::new(1.0, 0.0, 0.7, 1.0));
        assert!(c.is_normalized());
    }

    #[test]
    fn test_constants_normalized() {
        assert!(RgbaColor::OFF.is_normalized());
        assert!(RgbaColor::AMBER.is_normalized());
        assert_eq!(RgbaColor::AMBER.g, 0.7);
    }
}
