//! Driver layer for Duckiebot robots, simulated or real.
//!
//! A [`Duckiebot`] exposes one typed driver per component: motors and lights
//! take commands through [`Publisher`] handles, while the camera, range
//! finder, and wheel encoders deliver readings through [`Subscriber`]
//! handles, either by callback or by polling. The same program runs against
//! the in-process simulation or a real robot's daemon over TCP; only the
//! constructor changes.
//!
//! ```no_run
//! use duckie_io::Duckiebot;
//! use duckie_messages::{LedsPattern, RgbaColor};
//!
//! let robot = Duckiebot::simulated("vduckie")?;
//!
//! robot.lights.start()?;
//! robot.lights.publish(LedsPattern::uniform(RgbaColor::AMBER))?;
//!
//! robot.range_finder.attach(|range| println!("{}", range))?;
//! robot.range_finder.start()?;
//! # Ok::<(), duckie_io::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod daemon;
pub mod devices;
pub mod error;
pub mod robot;
pub mod streaming;

pub use config::{RobotConfig, RobotMode};
pub use core::{Backend, ComponentId, Publisher, Subscriber};
pub use error::{Error, Result};
pub use robot::Duckiebot;
pub use streaming::WireFormat;
