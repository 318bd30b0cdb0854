//! Print cumulative tick counts from one wheel encoder.
//!
//! ```text
//! cargo run --example wheel_encoders -- [--wheel left|right] [--mode sync|async] [--real] [--robot <name>]
//! ```
//!
//! The wheels are not driven, so on a simulated robot the count stays at
//! zero; push a real robot by hand to see it move.

use duckie_io::{Duckiebot, Result, Subscriber};
use duckie_messages::EncoderTicks;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut real = false;
    let mut name = "vduckie".to_string();
    let mut mode = "async".to_string();
    let mut wheel = "left".to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--real" => real = true,
            "--robot" => name = args.next().unwrap_or(name),
            "--mode" => mode = args.next().unwrap_or(mode),
            "--wheel" => wheel = args.next().unwrap_or(wheel),
            _ => {}
        }
    }

    let robot = if real {
        Duckiebot::real(&name)?
    } else {
        Duckiebot::simulated(&name)?
    };

    let encoder: &Subscriber<EncoderTicks> = match wheel.as_str() {
        "right" => &robot.right_wheel_encoder,
        _ => &robot.left_wheel_encoder,
    };
    log::info!("Reading the {} wheel encoder", wheel);

    match mode.as_str() {
        "sync" => {
            encoder.start()?;
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                if let Some(ticks) = encoder.capture(true)? {
                    println!("Ticks: {}", ticks.count);
                }
            }
        }
        _ => {
            encoder.attach(|ticks| println!("Ticks: {}", ticks.count))?;
            encoder.start()?;
            std::thread::sleep(Duration::from_secs(10));
        }
    }

    encoder.stop()?;
    println!("Stopped.");
    Ok(())
}
