//! Configuration for duckie-io
//!
//! Loads configuration from a TOML file. The same structure serves the
//! daemon binary (robot side) and client programs constructing a
//! [`crate::Duckiebot`] from a file.

use crate::devices::sim::SimulationConfig;
use crate::error::Result;
use crate::streaming::WireFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default TCP port of the robot daemon
pub const DEFAULT_PORT: u16 = 7560;

/// Which backend a robot handle talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    /// In-process simulation backend
    Simulated,
    /// TCP connection to a robot daemon
    Real,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    pub robot: RobotSection,
    pub network: NetworkConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Robot identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotSection {
    /// Robot name, e.g. `db21j3` or `map_0/vehicle_0`
    pub name: String,
    /// Backend selection
    pub mode: RobotMode,
}

/// Network configuration for the daemon and the remote backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// TCP bind address for the daemon, e.g. `0.0.0.0:7560`
    pub bind_address: String,
    /// Wire format for frames (`postcard` or `json`)
    #[serde(default)]
    pub wire_format: WireFormat,
}

impl RobotConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: RobotConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration for a simulated DB21J
    pub fn simulated_defaults(name: &str) -> Self {
        Self {
            robot: RobotSection {
                name: name.to_string(),
                mode: RobotMode::Simulated,
            },
            network: NetworkConfig {
                bind_address: format!("0.0.0.0:{}", DEFAULT_PORT),
                wire_format: WireFormat::default(),
            },
            simulation: SimulationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_defaults() {
        let config = RobotConfig::simulated_defaults("map_0/vehicle_0");
        assert_eq!(config.robot.name, "map_0/vehicle_0");
        assert_eq!(config.robot.mode, RobotMode::Simulated);
        assert_eq!(config.network.bind_address, "0.0.0.0:7560");
        assert_eq!(config.network.wire_format, WireFormat::Postcard);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RobotConfig::simulated_defaults("db21j3");
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[robot]"));
        assert!(toml_string.contains("[network]"));
        assert!(toml_string.contains("[simulation]"));
        assert!(toml_string.contains("name = \"db21j3\""));

        let parsed: RobotConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed.robot.name, config.robot.name);
        assert_eq!(parsed.robot.mode, config.robot.mode);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[robot]
name = "db21j3"
mode = "real"

[network]
bind_address = "127.0.0.1:7560"
wire_format = "json"
"#;

        let config: RobotConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.robot.mode, RobotMode::Real);
        assert_eq!(config.network.wire_format, WireFormat::Json);
        // Missing [simulation] section falls back to defaults
        assert!(config.simulation.camera.rate_hz > 0.0);
    }
}
