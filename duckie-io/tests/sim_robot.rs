//! End-to-end tests against the simulation backend

use duckie_io::{Duckiebot, Error};
use duckie_messages::WheelSpeeds;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_camera_capture_blocking() {
    let robot = Duckiebot::simulated("test").unwrap();
    robot.camera.start().unwrap();

    let frame = robot.camera.capture(true).unwrap().unwrap();
    assert_eq!(frame.shape(), (480, 640, 3));

    robot.camera.stop().unwrap();
}

#[test]
fn test_camera_callback_stream() {
    let robot = Duckiebot::simulated("test").unwrap();

    let count = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&count);
    robot
        .camera
        .attach(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    robot.camera.start().unwrap();

    // 20 Hz nominal; expect at least a handful of frames in a second
    thread::sleep(Duration::from_millis(1000));
    robot.camera.stop().unwrap();

    let frames = count.load(Ordering::Relaxed);
    assert!(frames >= 5, "only {} frames in 1s", frames);
}

#[test]
fn test_blocking_capture_measures_sensor_rate() {
    let robot = Duckiebot::simulated("test").unwrap();
    robot.range_finder.start().unwrap();

    // Count blocking captures over one second; nominal rate is 20 Hz
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut count = 0;
    while Instant::now() < deadline {
        if robot.range_finder.capture(true).unwrap().is_some() {
            count += 1;
        }
    }
    robot.range_finder.stop().unwrap();

    assert!((10..=35).contains(&count), "count={}", count);
}

#[test]
fn test_capture_before_start_fails() {
    let robot = Duckiebot::simulated("test").unwrap();
    assert!(matches!(
        robot.range_finder.capture(false),
        Err(Error::NotStarted(_))
    ));
}

#[test]
fn test_range_finder_delivers_readings() {
    let robot = Duckiebot::simulated("test").unwrap();
    robot.range_finder.start().unwrap();

    let reading = robot.range_finder.capture(true).unwrap().unwrap();
    if let Some(meters) = reading.distance() {
        assert!(meters > 0.0);
    }

    robot.range_finder.stop().unwrap();
}

#[test]
fn test_driving_advances_encoders() {
    let robot = Duckiebot::simulated("test").unwrap();

    robot.motors.start().unwrap();
    robot.left_wheel_encoder.start().unwrap();
    robot.motors.publish(WheelSpeeds::new(1.0, 1.0)).unwrap();

    // Full duty at 22 rad/s yields a few hundred ticks per second
    thread::sleep(Duration::from_millis(800));
    let ticks = robot
        .left_wheel_encoder
        .capture(false)
        .unwrap()
        .expect("no encoder data after 800ms");
    assert!(ticks.count > 50, "count={}", ticks.count);

    robot.motors.publish(WheelSpeeds::stop()).unwrap();
    robot.motors.stop().unwrap();
    robot.left_wheel_encoder.stop().unwrap();
}

#[test]
fn test_stopped_motors_hold_encoders() {
    let robot = Duckiebot::simulated("test").unwrap();
    robot.left_wheel_encoder.start().unwrap();

    // Motors never started, so no commands take effect
    thread::sleep(Duration::from_millis(300));
    let ticks = robot
        .left_wheel_encoder
        .capture(false)
        .unwrap()
        .expect("no encoder data after 300ms");
    assert_eq!(ticks.count, 0);

    robot.left_wheel_encoder.stop().unwrap();
}

#[test]
fn test_nonblocking_capture_returns_newest() {
    let robot = Duckiebot::simulated("test").unwrap();
    robot.range_finder.start().unwrap();

    // Let several readings queue up, then drain
    thread::sleep(Duration::from_millis(500));
    assert!(robot.range_finder.capture(false).unwrap().is_some());
    // Queue drained; an immediate second poll finds nothing
    assert!(robot.range_finder.capture(false).unwrap().is_none());

    robot.range_finder.stop().unwrap();
}
