//! LED patterns grouping one color per corner

use crate::color::RgbaColor;
use serde::{Deserialize, Serialize};

/// One color per corner LED of a DB21-class robot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedsPattern {
    pub front_left: RgbaColor,
    pub front_right: RgbaColor,
    pub rear_left: RgbaColor,
    pub rear_right: RgbaColor,
}

impl LedsPattern {
    /// Same color on all four corners
    pub fn uniform(color: RgbaColor) -> Self {
        Self {
            front_left: color,
            front_right: color,
            rear_left: color,
            rear_right: color,
        }
    }

    /// All LEDs off
    pub fn off() -> Self {
        Self::uniform(RgbaColor::OFF)
    }
}

impl Default for LedsPattern {
    fn default() -> Self {
        Self::off()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sets_all_corners() {
        let p = LedsPattern::uniform(RgbaColor::AMBER);
        assert_eq!(p.front_left, RgbaColor::AMBER);
        assert_eq!(p.front_right, RgbaColor::AMBER);
        assert_eq!(p.rear_left, RgbaColor::AMBER);
        assert_eq!(p.rear_right, RgbaColor::AMBER);
    }

    #[test]
    fn test_default_is_off() {
        assert_eq!(LedsPattern::default(), LedsPattern::off());
    }
}
