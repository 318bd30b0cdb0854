//! Range finder simulation
//!
//! The simulated target sweeps toward and away from the sensor; readings
//! past the sensor maximum come back out of range, exercising both arms of
//! the optional-distance payload.

use super::config::RangeSimConfig;
use super::noise::Noise;
use duckie_messages::Range;
use std::f32::consts::TAU;

pub struct RangeSimulator {
    config: RangeSimConfig,
    noise: Noise,
    /// Sweep phase in radians
    phase: f32,
}

impl RangeSimulator {
    pub fn new(config: &RangeSimConfig, noise: Noise) -> Self {
        Self {
            config: config.clone(),
            noise,
            phase: 0.0,
        }
    }

    /// Advance the sweep by `dt` seconds and produce one reading
    pub fn update(&mut self, dt: f32) -> Range {
        self.phase = (self.phase + TAU * dt / self.config.sweep_period_s) % TAU;

        let target = self.config.sweep_center_m + self.config.sweep_amplitude_m * self.phase.sin();
        let measured = target + self.noise.gaussian(self.config.noise_stddev_m);

        if measured > self.config.max_range_m {
            Range::out_of_range()
        } else {
            Range::meters(measured.max(self.config.min_range_m))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_covers_both_outcomes() {
        let config = RangeSimConfig::default();
        let mut sim = RangeSimulator::new(&config, Noise::new(42));

        let mut in_range = 0;
        let mut out_of_range = 0;
        // One full sweep period at 20Hz
        let steps = (config.sweep_period_s * 20.0) as usize;
        for _ in 0..steps {
            if sim.update(0.05).is_out_of_range() {
                out_of_range += 1;
            } else {
                in_range += 1;
            }
        }

        assert!(in_range > 0);
        assert!(out_of_range > 0);
    }

    #[test]
    fn test_readings_respect_envelope() {
        let config = RangeSimConfig::default();
        let mut sim = RangeSimulator::new(&config, Noise::new(7));

        for _ in 0..500 {
            if let Some(d) = sim.update(0.05).distance() {
                assert!(d >= config.min_range_m, "d={}", d);
                assert!(d <= config.max_range_m, "d={}", d);
            }
        }
    }
}
