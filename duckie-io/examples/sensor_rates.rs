//! Measure the delivery rate of one sensor stream.
//!
//! ```text
//! cargo run --example sensor_rates -- [--component camera|range_finder|left_encoder|right_encoder]
//!                                     [--mode sync|async] [--real] [--robot <name>]
//! ```
//!
//! Counts the payloads the selected sensor delivers over a ten-second
//! window, either through a callback (`async`, the default) or by blocking
//! `capture` (`sync`), and prints the rate rounded to whole hertz. On a
//! default simulated robot the camera and range finder measure 20 Hz and
//! each encoder 30 Hz.

use duckie_io::{Duckiebot, Result, Subscriber};
use duckie_messages::Payload;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DURATION_SECS: u64 = 10;

fn measure<T>(subscriber: &Subscriber<T>, sync: bool) -> Result<u32>
where
    T: TryFrom<Payload, Error = duckie_messages::Error> + Send + 'static,
{
    if sync {
        subscriber.start()?;
        let deadline = Instant::now() + Duration::from_secs(DURATION_SECS);
        let mut count = 0;
        while Instant::now() < deadline {
            if subscriber.capture(true)?.is_some() {
                count += 1;
            }
        }
        subscriber.stop()?;
        return Ok(count);
    }

    let count = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&count);
    subscriber.attach(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    })?;
    subscriber.start()?;
    std::thread::sleep(Duration::from_secs(DURATION_SECS));
    subscriber.stop()?;
    Ok(count.load(Ordering::Relaxed))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut real = false;
    let mut name = "vduckie".to_string();
    let mut mode = "async".to_string();
    let mut component = "camera".to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--real" => real = true,
            "--robot" => name = args.next().unwrap_or(name),
            "--mode" => mode = args.next().unwrap_or(mode),
            "--component" => component = args.next().unwrap_or(component),
            _ => {}
        }
    }
    let sync = mode == "sync";

    let robot = if real {
        Duckiebot::real(&name)?
    } else {
        Duckiebot::simulated(&name)?
    };

    log::info!(
        "Measuring {} for {} seconds ({})",
        component,
        DURATION_SECS,
        mode
    );
    let count = match component.as_str() {
        "range_finder" => measure(&robot.range_finder, sync)?,
        "left_encoder" => measure(&robot.left_wheel_encoder, sync)?,
        "right_encoder" => measure(&robot.right_wheel_encoder, sync)?,
        _ => measure(&robot.camera, sync)?,
    };

    println!(
        "Measured: {}Hz",
        (f64::from(count) / DURATION_SECS as f64).round()
    );
    Ok(())
}
