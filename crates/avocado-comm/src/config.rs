//! Communicator configuration.
//!
//! Configuration can be loaded from a YAML file; every field is optional and
//! falls back to the defaults below.
//!
//! ```yaml
//! port: /dev/ttyACM0
//! baud_rate: 115200
//! timeout_ms: 10
//! position_unit: degrees
//! velocity_unit: rpm
//! checksum: decimal
//! ```

use crate::error::{CommError, Result};
use crate::serial::{DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
use crate::units::{PositionUnit, VelocityUnit};
use avocado_protocol::ChecksumEncoding;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default serial device.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Configuration for a [`Communicator`](crate::Communicator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommConfig {
    /// Serial device path.
    pub port: String,
    /// Line speed in baud.
    pub baud_rate: u32,
    /// Read timeout per poll in milliseconds.
    pub timeout_ms: u64,
    /// Unit for positions given by the caller.
    pub position_unit: PositionUnit,
    /// Unit for velocities given by the caller.
    pub velocity_unit: VelocityUnit,
    /// Checksum rendering on the wire.
    pub checksum: ChecksumEncoding,
}

impl Default for CommConfig {
    fn default() -> Self {
        CommConfig {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            position_unit: PositionUnit::default(),
            velocity_unit: VelocityUnit::default(),
            checksum: ChecksumEncoding::default(),
        }
    }
}

impl CommConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: CommConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(CommError::Config("port must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(CommError::Config("baud_rate must be positive".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(CommError::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Read timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CommConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout(), Duration::from_millis(10));
        assert_eq!(config.position_unit, PositionUnit::Radians);
        assert_eq!(config.velocity_unit, VelocityUnit::Rps);
        assert_eq!(config.checksum, ChecksumEncoding::Decimal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = CommConfig::from_yaml_str("port: COM7\nposition_unit: degrees\n").unwrap();
        assert_eq!(config.port, "COM7");
        assert_eq!(config.position_unit, PositionUnit::Degrees);
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = CommConfig {
            port: "/dev/ttyUSB1".to_string(),
            baud_rate: 57_600,
            timeout_ms: 25,
            position_unit: PositionUnit::Degrees,
            velocity_unit: VelocityUnit::Rpm,
            checksum: ChecksumEncoding::Padded,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(CommConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            CommConfig::from_yaml_str("baud_rate: 0"),
            Err(CommError::Config(_))
        ));
        assert!(matches!(
            CommConfig::from_yaml_str("timeout_ms: 0"),
            Err(CommError::Config(_))
        ));
        assert!(matches!(
            CommConfig::from_yaml_str("velocity_unit: furlongs"),
            Err(CommError::ConfigParse(_))
        ));
        assert!(matches!(
            CommConfig::from_yaml_str("baud: 9600"),
            Err(CommError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: /dev/ttyACM3\nvelocity_unit: rpm").unwrap();
        let config = CommConfig::load(file.path()).unwrap();
        assert_eq!(config.port, "/dev/ttyACM3");
        assert_eq!(config.velocity_unit, VelocityUnit::Rpm);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            CommConfig::load("/nonexistent/avocado.yaml"),
            Err(CommError::Io(_))
        ));
    }
}
