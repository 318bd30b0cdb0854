//! Range-finder readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single time-of-flight range reading.
///
/// `None` means the target is beyond the sensor's maximum range ("out of
/// range"), which is a normal reading and not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    meters: Option<f32>,
}

impl Range {
    /// Reading with a measured distance in meters
    pub fn meters(distance: f32) -> Self {
        Self {
            meters: Some(distance),
        }
    }

    /// Out-of-range reading
    pub fn out_of_range() -> Self {
        Self { meters: None }
    }

    /// Measured distance, `None` if out of range
    pub fn distance(&self) -> Option<f32> {
        self.meters
    }

    pub fn is_out_of_range(&self) -> bool {
        self.meters.is_none()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meters {
            Some(d) => write!(f, "{} meters", d),
            None => write!(f, "out of range"),
        }
    }
}
