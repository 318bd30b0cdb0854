//! Wheel and encoder simulation
//!
//! Integrates published motor duties into cumulative encoder tick counts.

use super::config::WheelSimConfig;
use super::noise::Noise;
use duckie_messages::TICKS_PER_REVOLUTION;
use std::f32::consts::TAU;

/// Simulates both wheel encoders of a differential drive
pub struct WheelSimulator {
    config: WheelSimConfig,
    noise: Noise,
    /// Fractional ticks carried between updates
    left_accumulator: f32,
    right_accumulator: f32,
    /// Cumulative tick counts (signed: reverse decrements)
    left_ticks: i32,
    right_ticks: i32,
}

impl WheelSimulator {
    pub fn new(config: &WheelSimConfig, noise: Noise) -> Self {
        Self {
            config: config.clone(),
            noise,
            left_accumulator: 0.0,
            right_accumulator: 0.0,
            left_ticks: 0,
            right_ticks: 0,
        }
    }

    /// Advance the simulation by `dt` seconds with the given motor duties.
    ///
    /// Returns the cumulative `(left, right)` tick counts.
    pub fn update(&mut self, left_duty: f32, right_duty: f32, dt: f32) -> (i32, i32) {
        let ticks_per_rad = TICKS_PER_REVOLUTION as f32 / TAU;

        // Duty to wheel angle, with multiplicative slip
        let left_angle = left_duty * self.config.max_wheel_rad_s * dt;
        let right_angle = right_duty * self.config.max_wheel_rad_s * dt;
        let left_slip = 1.0 + self.noise.gaussian(self.config.slip_stddev);
        let right_slip = 1.0 + self.noise.gaussian(self.config.slip_stddev);

        self.left_accumulator += left_angle * ticks_per_rad * left_slip;
        self.right_accumulator += right_angle * ticks_per_rad * right_slip;

        // Move whole ticks into the counters, keep the fraction
        let left_whole = self.left_accumulator.trunc();
        let right_whole = self.right_accumulator.trunc();
        self.left_accumulator -= left_whole;
        self.right_accumulator -= right_whole;

        self.left_ticks = self.left_ticks.wrapping_add(left_whole as i32);
        self.right_ticks = self.right_ticks.wrapping_add(right_whole as i32);

        (self.left_ticks, self.right_ticks)
    }

    pub fn counts(&self) -> (i32, i32) {
        (self.left_ticks, self.right_ticks)
    }
}
