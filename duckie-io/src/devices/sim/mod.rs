//! Hardware-free simulation backend
//!
//! Simulates the sensors and actuators of a DB21-class robot:
//!
//! | Component | Simulation method |
//! |-----------|-------------------|
//! | Camera | Synthetic frames or a republished still image |
//! | Range finder | Sinusoidal target sweep with Gaussian noise |
//! | Wheel encoders | Duty-cycle integration with slip noise |
//! | Motors / lights | Commanded state held in shared memory |
//!
//! One simulation thread ticks at `base_rate_hz` and emits sensor payloads
//! into subscriber channels at each sensor's own rate. Components produce
//! nothing until started, and actuator commands published before `start`
//! are ignored with a warning, matching real-robot behavior where a driver
//! must be running before commands take effect.

pub mod config;

mod camera;
mod noise;
mod range;
mod wheels;

pub use config::{CameraSimConfig, RangeSimConfig, SimulationConfig, WheelSimConfig};

use crate::core::{Backend, ComponentId};
use crate::devices::{dispatch, has_subscribers, register_subscriber, SubscriberMap};
use crate::error::{Error, Result};

use camera::CameraSimulator;
use noise::Noise;
use range::RangeSimulator;
use wheels::WheelSimulator;

use crossbeam_channel::Receiver;
use duckie_messages::{EncoderTicks, LedsPattern, Payload, WheelSpeeds};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Atomic f32 wrapper using AtomicU32
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Per-component started/stopped flags
struct ComponentFlags {
    motors: AtomicBool,
    lights: AtomicBool,
    camera: AtomicBool,
    range_finder: AtomicBool,
    left_wheel_encoder: AtomicBool,
    right_wheel_encoder: AtomicBool,
}

impl ComponentFlags {
    fn new() -> Self {
        Self {
            motors: AtomicBool::new(false),
            lights: AtomicBool::new(false),
            camera: AtomicBool::new(false),
            range_finder: AtomicBool::new(false),
            left_wheel_encoder: AtomicBool::new(false),
            right_wheel_encoder: AtomicBool::new(false),
        }
    }

    fn get(&self, id: ComponentId) -> &AtomicBool {
        match id {
            ComponentId::Motors => &self.motors,
            ComponentId::Lights => &self.lights,
            ComponentId::Camera => &self.camera,
            ComponentId::RangeFinder => &self.range_finder,
            ComponentId::LeftWheelEncoder => &self.left_wheel_encoder,
            ComponentId::RightWheelEncoder => &self.right_wheel_encoder,
        }
    }
}

/// State shared between the backend surface and the simulation thread
struct SharedState {
    left_duty: AtomicF32,
    right_duty: AtomicF32,
    leds: Mutex<LedsPattern>,
    started: ComponentFlags,
    shutdown: AtomicBool,
}

impl SharedState {
    fn new() -> Self {
        Self {
            left_duty: AtomicF32::new(0.0),
            right_duty: AtomicF32::new(0.0),
            leds: Mutex::new(LedsPattern::off()),
            started: ComponentFlags::new(),
            shutdown: AtomicBool::new(false),
        }
    }
}

/// Simulation backend for a named robot
pub struct SimBackend {
    shared: Arc<SharedState>,
    subscribers: Arc<SubscriberMap>,
    sim_thread: Mutex<Option<JoinHandle<()>>>,
}

impl SimBackend {
    /// Create the backend and start its simulation thread
    pub fn new(name: &str, config: SimulationConfig) -> Result<Self> {
        let shared = Arc::new(SharedState::new());
        let subscribers: Arc<SubscriberMap> = Arc::new(Mutex::new(Default::default()));

        // Build the simulators up front so configuration errors surface here
        let camera_sim = CameraSimulator::new(&config.camera)?;
        let noise = Noise::new(config.random_seed);
        let wheel_sim = WheelSimulator::new(&config.wheels, noise.clone());
        let range_sim = RangeSimulator::new(&config.range, noise);

        let thread_shared = Arc::clone(&shared);
        let thread_subscribers = Arc::clone(&subscribers);
        let handle = thread::Builder::new()
            .name("sim-loop".to_string())
            .spawn(move || {
                simulation_loop(
                    config,
                    thread_shared,
                    thread_subscribers,
                    camera_sim,
                    range_sim,
                    wheel_sim,
                );
            })
            .map_err(|e| Error::Other(format!("failed to spawn simulation thread: {}", e)))?;

        log::info!("SimBackend: simulated robot '{}' ready", name);

        Ok(Self {
            shared,
            subscribers,
            sim_thread: Mutex::new(Some(handle)),
        })
    }

    /// Currently commanded LED pattern (for tests and the daemon log)
    pub fn led_pattern(&self) -> LedsPattern {
        *self.shared.leds.lock()
    }
}

impl Backend for SimBackend {
    fn start(&self, id: ComponentId) -> Result<()> {
        self.shared.started.get(id).store(true, Ordering::Relaxed);
        log::debug!("SimBackend: {} started", id);
        Ok(())
    }

    fn stop(&self, id: ComponentId) -> Result<()> {
        self.shared.started.get(id).store(false, Ordering::Relaxed);
        if id == ComponentId::Motors {
            // Stopping the motor driver halts the wheels
            self.shared.left_duty.store(0.0, Ordering::Relaxed);
            self.shared.right_duty.store(0.0, Ordering::Relaxed);
        }
        log::debug!("SimBackend: {} stopped", id);
        Ok(())
    }

    fn publish(&self, id: ComponentId, payload: Payload) -> Result<()> {
        match id {
            ComponentId::Motors => {
                let speeds = WheelSpeeds::try_from(payload).map_err(Error::Message)?;
                if !self.shared.started.motors.load(Ordering::Relaxed) {
                    log::warn!("SimBackend: motors command ignored: not started");
                    return Ok(());
                }
                self.shared.left_duty.store(speeds.left, Ordering::Relaxed);
                self.shared.right_duty.store(speeds.right, Ordering::Relaxed);
                log::debug!(
                    "SimBackend: wheel duties set to ({:.2}, {:.2})",
                    speeds.left,
                    speeds.right
                );
                Ok(())
            }
            ComponentId::Lights => {
                let pattern = LedsPattern::try_from(payload).map_err(Error::Message)?;
                if !self.shared.started.lights.load(Ordering::Relaxed) {
                    log::warn!("SimBackend: lights command ignored: not started");
                    return Ok(());
                }
                *self.shared.leds.lock() = pattern;
                log::debug!("SimBackend: LED pattern updated");
                Ok(())
            }
            sensor => Err(Error::NotSupported(format!(
                "{} does not accept published data",
                sensor
            ))),
        }
    }

    fn subscribe(&self, id: ComponentId) -> Result<Receiver<Payload>> {
        if !id.is_sensor() {
            return Err(Error::NotSupported(format!(
                "{} does not produce data",
                id
            )));
        }
        Ok(register_subscriber(&self.subscribers, id))
    }
}

impl Drop for SimBackend {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.sim_thread.lock().take() {
            let _ = handle.join();
        }
    }
}

/// Main simulation loop
fn simulation_loop(
    config: SimulationConfig,
    shared: Arc<SharedState>,
    subscribers: Arc<SubscriberMap>,
    camera_sim: CameraSimulator,
    mut range_sim: RangeSimulator,
    mut wheel_sim: WheelSimulator,
) {
    let base_period = Duration::from_secs_f32(1.0 / config.base_rate_hz.max(1.0));
    let camera_period = 1.0 / config.camera.rate_hz.max(0.001);
    let range_period = 1.0 / config.range.rate_hz.max(0.001);
    let encoder_period = 1.0 / config.wheels.encoder_rate_hz.max(0.001);

    let mut camera_acc = 0.0f32;
    let mut range_acc = 0.0f32;
    let mut encoder_acc = 0.0f32;
    let mut frame_index: u64 = 0;
    let mut last = Instant::now();

    log::info!(
        "Simulation loop started: base={}Hz camera={}Hz range={}Hz encoders={}Hz",
        config.base_rate_hz,
        config.camera.rate_hz,
        config.range.rate_hz,
        config.wheels.encoder_rate_hz
    );

    while !shared.shutdown.load(Ordering::Relaxed) {
        let loop_start = Instant::now();
        let dt = loop_start.duration_since(last).as_secs_f32();
        last = loop_start;

        // Integrate wheel motion every tick regardless of emission rate
        let left = shared.left_duty.load(Ordering::Relaxed);
        let right = shared.right_duty.load(Ordering::Relaxed);
        let (left_ticks, right_ticks) = wheel_sim.update(left, right, dt);

        encoder_acc += dt;
        if encoder_acc >= encoder_period {
            encoder_acc -= encoder_period;
            if shared.started.left_wheel_encoder.load(Ordering::Relaxed) {
                dispatch(
                    &subscribers,
                    ComponentId::LeftWheelEncoder,
                    &Payload::from(EncoderTicks::new(left_ticks)),
                );
            }
            if shared.started.right_wheel_encoder.load(Ordering::Relaxed) {
                dispatch(
                    &subscribers,
                    ComponentId::RightWheelEncoder,
                    &Payload::from(EncoderTicks::new(right_ticks)),
                );
            }
        }

        range_acc += dt;
        if range_acc >= range_period {
            range_acc -= range_period;
            if shared.started.range_finder.load(Ordering::Relaxed) {
                let reading = range_sim.update(range_period);
                dispatch(
                    &subscribers,
                    ComponentId::RangeFinder,
                    &Payload::from(reading),
                );
            }
        }

        camera_acc += dt;
        if camera_acc >= camera_period {
            camera_acc -= camera_period;
            // Frames are expensive; skip generation with nobody listening
            if shared.started.camera.load(Ordering::Relaxed)
                && has_subscribers(&subscribers, ComponentId::Camera)
            {
                let frame = camera_sim.generate(frame_index);
                frame_index += 1;
                dispatch(&subscribers, ComponentId::Camera, &Payload::from(frame));
            }
        }

        let elapsed = loop_start.elapsed();
        if elapsed < base_period {
            thread::sleep(base_period - elapsed);
        }
    }

    log::info!("Simulation loop terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckie_messages::Range;

    fn backend() -> SimBackend {
        SimBackend::new("test", SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_publish_to_sensor_rejected() {
        let sim = backend();
        let err = sim
            .publish(ComponentId::Camera, Payload::from(Range::out_of_range()))
            .unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
    }

    #[test]
    fn test_subscribe_to_actuator_rejected() {
        let sim = backend();
        assert!(sim.subscribe(ComponentId::Motors).is_err());
        assert!(sim.subscribe(ComponentId::Camera).is_ok());
    }

    #[test]
    fn test_wrong_payload_kind_rejected() {
        let sim = backend();
        sim.start(ComponentId::Motors).unwrap();
        let err = sim
            .publish(ComponentId::Motors, Payload::from(Range::meters(1.0)))
            .unwrap_err();
        assert!(matches!(err, Error::Message(_)));
    }

    #[test]
    fn test_lights_command_requires_start() {
        let sim = backend();
        let pattern = LedsPattern::uniform(duckie_messages::RgbaColor::AMBER);

        // Ignored before start
        sim.publish(ComponentId::Lights, Payload::from(pattern))
            .unwrap();
        assert_eq!(sim.led_pattern(), LedsPattern::off());

        sim.start(ComponentId::Lights).unwrap();
        sim.publish(ComponentId::Lights, Payload::from(pattern))
            .unwrap();
        assert_eq!(sim.led_pattern(), pattern);
    }
}
