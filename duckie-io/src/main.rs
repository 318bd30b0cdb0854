//! Robot daemon binary
//!
//! Hosts a simulated robot behind the TCP streaming protocol so remote
//! programs can drive it exactly as they would a real one:
//!
//! ```text
//! duckie-io [--config robot.toml]
//! ```
//!
//! Without a configuration file a default simulated DB21J named `vduckie`
//! is served on port 7560.

use duckie_io::config::RobotConfig;
use duckie_io::daemon::Daemon;
use duckie_io::devices::SimBackend;
use duckie_io::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn parse_config_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => return args.next(),
            "--help" | "-h" => {
                println!("Usage: duckie-io [--config <robot.toml>]");
                std::process::exit(0);
            }
            other => return Some(other.to_string()),
        }
    }
    None
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match parse_config_path() {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            RobotConfig::from_file(&path)?
        }
        None => {
            log::info!("No configuration file given, serving default simulated robot");
            RobotConfig::simulated_defaults("vduckie")
        }
    };

    let backend = Arc::new(SimBackend::new(
        &config.robot.name,
        config.simulation.clone(),
    )?);
    let daemon = Daemon::bind(
        config.network.bind_address.as_str(),
        backend,
        config.network.wire_format,
    )?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Shutdown signal received");
        running_clone.store(false, Ordering::Relaxed);
    })
    .map_err(|e| duckie_io::Error::Other(format!("failed to install signal handler: {}", e)))?;

    daemon.run(running)
}
