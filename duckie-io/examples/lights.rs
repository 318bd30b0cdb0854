//! Blink all LEDs amber at 1.4 Hz for eight seconds.
//!
//! ```text
//! cargo run --example lights -- [--real] [--robot <name>]
//! ```

use duckie_io::{Duckiebot, Result};
use duckie_messages::{LedsPattern, RgbaColor};
use std::time::{Duration, Instant};

const BLINK_HZ: f32 = 1.4;

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

    robot.lights.start()?;
    log::info!("Blinking at {} Hz", BLINK_HZ);

    // Each state is held for 1/frequency
    let hold = Duration::from_secs_f32(1.0 / BLINK_HZ);
    let deadline = Instant::now() + Duration::from_secs(8);
    let mut lit = false;

    while Instant::now() < deadline {
        let pattern = if lit {
            LedsPattern::off()
        } else {
            LedsPattern::uniform(RgbaColor::AMBER)
        };
        robot.lights.publish(pattern)?;
        lit = !lit;
        std::thread::sleep(hold);
    }

    robot.lights.publish(LedsPattern::off())?;
    robot.lights.stop()?;
    println!("Stopped.");
    Ok(())
}
