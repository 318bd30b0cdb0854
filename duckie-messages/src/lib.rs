//! Typed message payloads for Duckiebot component drivers.
//!
//! This crate defines the value objects that flow between component drivers
//! and their backends: actuator commands (wheel speeds, LED patterns) and
//! sensor readings (camera frames, range readings, encoder ticks), plus the
//! [`Payload`] union used by untyped transport layers.
//!
//! All invariants on the values themselves (channel ranges, duty-cycle
//! ranges, image geometry) live here; drivers pass these objects through
//! without inspecting them.

mod color;
mod error;
mod image;
mod leds;
mod motion;
mod payload;
mod range;
mod ticks;

pub use color::RgbaColor;
pub use error::{Error, Result};
pub use image::ImageFrame;
pub use leds::LedsPattern;
pub use motion::WheelSpeeds;
pub use payload::Payload;
pub use range::Range;
pub use ticks::{EncoderTicks, TICKS_PER_REVOLUTION};
