//! Loopback tests: robot handle -> TCP -> daemon -> simulation backend

use duckie_io::daemon::Daemon;
use duckie_io::devices::sim::SimulationConfig;
use duckie_io::devices::SimBackend;
use duckie_io::{Duckiebot, WireFormat};
use duckie_messages::WheelSpeeds;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct DaemonFixture {
    endpoint: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DaemonFixture {
    fn start() -> Self {
        let backend = Arc::new(SimBackend::new("loopback", SimulationConfig::default()).unwrap());
        let daemon = Daemon::bind("127.0.0.1:0", backend, WireFormat::default()).unwrap();
        let endpoint = daemon.local_addr().unwrap().to_string();

        let running = Arc::new(AtomicBool::new(true));
        let daemon_running = Arc::clone(&running);
        let handle = thread::spawn(move || {
            daemon.run(daemon_running).unwrap();
        });

        Self {
            endpoint,
            running,
            handle: Some(handle),
        }
    }
}

impl Drop for DaemonFixture {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

#[test]
fn test_remote_range_finder_stream() {
    let daemon = DaemonFixture::start();
    let robot = Duckiebot::real_at("loopback", &daemon.endpoint).unwrap();

    robot.range_finder.start().unwrap();
    let reading = robot.range_finder.capture(true).unwrap().unwrap();
    if let Some(meters) = reading.distance() {
        assert!(meters > 0.0);
    }
    robot.range_finder.stop().unwrap();
}

#[test]
fn test_remote_camera_frames_cross_the_wire() {
    let daemon = DaemonFixture::start();
    let robot = Duckiebot::real_at("loopback", &daemon.endpoint).unwrap();

    robot.camera.start().unwrap();
    let frame = robot.camera.capture(true).unwrap().unwrap();
    assert_eq!(frame.shape(), (480, 640, 3));
    robot.camera.stop().unwrap();
}

#[test]
fn test_remote_motor_commands_reach_the_sim() {
    let daemon = DaemonFixture::start();
    let robot = Duckiebot::real_at("loopback", &daemon.endpoint).unwrap();

    robot.motors.start().unwrap();
    robot.left_wheel_encoder.start().unwrap();
    robot.motors.publish(WheelSpeeds::new(1.0, 1.0)).unwrap();

    thread::sleep(Duration::from_millis(800));
    let ticks = robot
        .left_wheel_encoder
        .capture(false)
        .unwrap()
        .expect("no encoder data over the wire");
    assert!(ticks.count > 50, "count={}", ticks.count);

    robot.motors.publish(WheelSpeeds::stop()).unwrap();
    robot.motors.stop().unwrap();
    robot.left_wheel_encoder.stop().unwrap();
}

#[test]
fn test_second_client_is_rejected() {
    let daemon = DaemonFixture::start();
    let robot = Duckiebot::real_at("loopback", &daemon.endpoint).unwrap();

    robot.range_finder.start().unwrap();
    assert!(robot.range_finder.capture(true).unwrap().is_some());

    // The daemon serves one handle at a time; a second connection gets
    // closed and its first read fails.
    let rejected = Duckiebot::real_at("loopback", &daemon.endpoint).unwrap();
    rejected.range_finder.start().ok();
    thread::sleep(Duration::from_millis(200));
    assert!(matches!(rejected.range_finder.capture(false), Ok(None) | Err(_)));

    robot.range_finder.stop().unwrap();
}
