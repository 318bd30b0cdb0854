//! Simulation parameters
//!
//! All fields have defaults so a `[simulation]` section in the TOML config
//! can be partial or absent entirely.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base tick rate of the simulation loop (Hz)
    pub base_rate_hz: f32,
    /// RNG seed; 0 draws entropy for non-deterministic runs
    pub random_seed: u64,
    pub camera: CameraSimConfig,
    pub range: RangeSimConfig,
    pub wheels: WheelSimConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_rate_hz: 100.0,
            random_seed: 0,
            camera: CameraSimConfig::default(),
            range: RangeSimConfig::default(),
            wheels: WheelSimConfig::default(),
        }
    }
}

/// Camera simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSimConfig {
    /// Frame rate (Hz)
    pub rate_hz: f32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Optional still image republished as every frame; synthetic frames
    /// are generated when unset
    pub source_image: Option<PathBuf>,
}

impl Default for CameraSimConfig {
    fn default() -> Self {
        Self {
            rate_hz: 20.0,
            width: 640,
            height: 480,
            source_image: None,
        }
    }
}

/// Range finder simulation parameters.
///
/// The simulated target distance sweeps sinusoidally between
/// `sweep_center_m - sweep_amplitude_m` and `sweep_center_m +
/// sweep_amplitude_m`; readings beyond `max_range_m` come back out of range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSimConfig {
    /// Reading rate (Hz)
    pub rate_hz: f32,
    /// Minimum measurable distance (m)
    pub min_range_m: f32,
    /// Maximum measurable distance (m)
    pub max_range_m: f32,
    /// Gaussian noise on in-range readings (m)
    pub noise_stddev_m: f32,
    /// Center of the target sweep (m)
    pub sweep_center_m: f32,
    /// Amplitude of the target sweep (m)
    pub sweep_amplitude_m: f32,
    /// Period of one full sweep (s)
    pub sweep_period_s: f32,
}

impl Default for RangeSimConfig {
    fn default() -> Self {
        // VL53L0X-ish envelope
        Self {
            rate_hz: 20.0,
            min_range_m: 0.04,
            max_range_m: 1.2,
            noise_stddev_m: 0.005,
            sweep_center_m: 0.7,
            sweep_amplitude_m: 0.6,
            sweep_period_s: 12.0,
        }
    }
}

/// Wheel and encoder simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSimConfig {
    /// Encoder emission rate (Hz)
    pub encoder_rate_hz: f32,
    /// Wheel angular velocity at full duty (rad/s)
    pub max_wheel_rad_s: f32,
    /// Multiplicative slip noise on integrated ticks
    pub slip_stddev: f32,
}

impl Default for WheelSimConfig {
    fn default() -> Self {
        Self {
            encoder_rate_hz: 30.0,
            max_wheel_rad_s: 22.0,
            slip_stddev: 0.01,
        }
    }
}
