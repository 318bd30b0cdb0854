//! Print range finder readings.
//!
//! ```text
//! cargo run --example range_finder -- [--mode sync|async] [--real] [--robot <name>]
//! ```
//!
//! The default `async` mode attaches a callback and runs for ten seconds,
//! long enough for the simulated target to sweep out of range; `sync` mode
//! polls with blocking `capture` for two seconds. An out-of-range reading
//! prints `Out of range.`

use duckie_io::{Duckiebot, Result};
use duckie_messages::Range;
use std::time::{Duration, Instant};

fn print_reading(range: &Range) {
    match range.distance() {
        Some(meters) => println!("Range: {} meters.", meters),
        None => println!("Out of range."),
    }
}

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

    match mode.as_str() {
        "sync" => {
            robot.range_finder.start()?;
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                if let Some(range) = robot.range_finder.capture(true)? {
                    print_reading(&range);
                }
            }
        }
        _ => {
            robot.range_finder.attach(print_reading)?;
            robot.range_finder.start()?;
            std::thread::sleep(Duration::from_secs(10));
        }
    }

    robot.range_finder.stop()?;
    println!("Stopped.");
    Ok(())
}
