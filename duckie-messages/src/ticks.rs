//! Wheel encoder tick counts

use serde::{Deserialize, Serialize};

/// Encoder resolution of the DB21 wheel encoders, in ticks per revolution
pub const TICKS_PER_REVOLUTION: u32 = 135;

/// Cumulative wheel encoder tick count.
///
/// Signed: driving backwards decrements the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderTicks {
    pub count: i32,
}

impl EncoderTicks {
    pub fn new(count: i32) -> Self {
        Self { count }
    }

    /// Whole wheel revolutions represented by this count
    pub fn revolutions(&self) -> f64 {
        f64::from(self.count) / f64::from(TICKS_PER_REVOLUTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revolutions() {
        assert_eq!(EncoderTicks::new(135).revolutions(), 1.0);
        assert_eq!(EncoderTicks::new(-270).revolutions(), -2.0);
    }
}
