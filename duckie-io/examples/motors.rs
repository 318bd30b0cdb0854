//! Drive both wheels at half duty for two seconds.
//!
//! ```text
//! cargo run --example motors -- [--real] [--robot <name>]
//! ```

use duckie_io::{Duckiebot, Result};
use duckie_messages::WheelSpeeds;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut real = false;
    let mut name = "vduckie".to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--real" => real = true,
            "--robot" => name = args.next().unwrap_or(name),
            _ => {}
        }
    }

    let robot = if real {
        Duckiebot::real(&name)?
    } else {
        Duckiebot::simulated(&name)?
    };

    robot.motors.start()?;
    log::info!("Driving forward at half duty");

    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        robot.motors.publish(WheelSpeeds::new(0.5, 0.5))?;
        std::thread::sleep(Duration::from_millis(250));
    }

    robot.motors.publish(WheelSpeeds::stop())?;
    robot.motors.stop()?;
    println!("Stopped.");
    Ok(())
}
