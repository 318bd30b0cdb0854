//! Print camera frame shapes for two seconds.
//!
//! ```text
//! cargo run --example camera -- [--mode sync|async] [--real] [--robot <name>]
//! ```
//!
//! In `async` mode (the default) a callback prints each frame's shape as it
//! arrives; in `sync` mode the main loop blocks on `capture`.

use duckie_io::{Duckiebot, Result};
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut real = false;
    let mut name = "vduckie".to_string();
    let mut mode = "async".to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--real" => real = true,
            "--robot" => name = args.next().unwrap_or(name),
            "--mode" => mode = args.next().unwrap_or(mode),
            _ => {}
        }
    }

    let robot = if real {
        Duckiebot::real(&name)?
    } else {
        Duckiebot::simulated(&name)?
    };

    let deadline = Instant::now() + Duration::from_secs(2);

    match mode.as_str() {
        "sync" => {
            robot.camera.start()?;
            while Instant::now() < deadline {
                if let Some(frame) = robot.camera.capture(true)? {
                    println!("{:?}", frame.shape());
                }
            }
        }
        _ => {
            robot.camera.attach(|frame| println!("{:?}", frame.shape()))?;
            robot.camera.start()?;
            std::thread::sleep(Duration::from_secs(2));
        }
    }

    robot.camera.stop()?;
    println!("Stopped.");
    Ok(())
}
