//! Robot handle
//!
//! A [`Duckiebot`] bundles one typed driver per component over a shared
//! backend. The drivers are public fields, so a program reads like the robot
//! it controls:
//!
//! ```no_run
//! use duckie_io::Duckiebot;
//! use duckie_messages::WheelSpeeds;
//!
//! let robot = Duckiebot::simulated("vduckie")?;
//! robot.motors.start()?;
//! robot.motors.publish(WheelSpeeds::new(0.5, 0.5))?;
//! # Ok::<(), duckie_io::Error>(())
//! ```

use crate::config::RobotConfig;
use crate::core::{Backend, ComponentId, Publisher, Subscriber};
use crate::devices::{create_backend, robot_endpoint, RemoteBackend, SimBackend};
use crate::error::Result;
use crate::streaming::WireFormat;
use duckie_messages::{EncoderTicks, ImageFrame, LedsPattern, Range, WheelSpeeds};
use std::sync::Arc;

/// Handle to one robot, simulated or real
pub struct Duckiebot {
    /// Differential-drive motors, commanded with duty cycles in [-1, 1]
    pub motors: Publisher<WheelSpeeds>,
    /// The five LEDs (four corners are addressable)
    pub lights: Publisher<LedsPattern>,
    /// Forward-facing camera, BGR8 frames
    pub camera: Subscriber<ImageFrame>,
    /// Forward-facing time-of-flight range finder
    pub range_finder: Subscriber<Range>,
    /// Left wheel encoder, cumulative signed ticks
    pub left_wheel_encoder: Subscriber<EncoderTicks>,
    /// Right wheel encoder, cumulative signed ticks
    pub right_wheel_encoder: Subscriber<EncoderTicks>,
}

impl Duckiebot {
    /// Connect to an in-process simulated robot with default simulation
    /// parameters
    pub fn simulated(name: &str) -> Result<Self> {
        let backend = SimBackend::new(name, Default::default())?;
        Ok(Self::from_backend(Arc::new(backend)))
    }

    /// Connect to the named real robot at `<name>.local` on the default
    /// daemon port
    pub fn real(name: &str) -> Result<Self> {
        Self::real_at(name, &robot_endpoint(name))
    }

    /// Connect to a real robot daemon at an explicit `host:port` endpoint
    pub fn real_at(name: &str, endpoint: &str) -> Result<Self> {
        log::info!("Connecting to robot '{}' at {}", name, endpoint);
        let backend = RemoteBackend::connect(endpoint, WireFormat::default())?;
        Ok(Self::from_backend(Arc::new(backend)))
    }

    /// Build the robot described by a configuration file
    pub fn from_config(config: &RobotConfig) -> Result<Self> {
        Ok(Self::from_backend(create_backend(config)?))
    }

    pub(crate) fn from_backend(backend: Arc<dyn Backend>) -> Self {
        Self {
            motors: Publisher::new(Arc::clone(&backend), ComponentId::Motors),
            lights: Publisher::new(Arc::clone(&backend), ComponentId::Lights),
            camera: Subscriber::new(Arc::clone(&backend), ComponentId::Camera),
            range_finder: Subscriber::new(Arc::clone(&backend), ComponentId::RangeFinder),
            left_wheel_encoder: Subscriber::new(
                Arc::clone(&backend),
                ComponentId::LeftWheelEncoder,
            ),
            right_wheel_encoder: Subscriber::new(backend, ComponentId::RightWheelEncoder),
        }
    }
}
