//! Error types for Lineq
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using LineqError
pub type Result<T> = std::result::Result<T, LineqError>;

/// Unified error type for Lineq operations
#[derive(Debug, Error)]
pub enum LineqError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Value table persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // Perception errors
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    // Actuation errors
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Black threshold {black} must be below white threshold {white}")]
    ThresholdOrder { black: f64, white: f64 },

    #[error("Parameter {name} out of range: {value} (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}

/// Value table persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Value table not found at {0}")]
    NotFound(String),

    #[error("Value table unreadable: {0}")]
    Io(String),

    #[error("Unknown action name in stored table: {0}")]
    UnknownAction(String),

    #[error("Unknown {field} name in stored table: {value}")]
    UnknownName { field: &'static str, value: String },

    #[error("Malformed value table: {0}")]
    Malformed(String),

    #[error("Unsupported table format version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Perception capability errors
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("{sensor} sensor unavailable: {reason}")]
    Unavailable { sensor: &'static str, reason: String },

    #[error("{sensor} reading {value} outside [{min}, {max}]")]
    OutOfRange {
        sensor: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Actuator capability errors
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Drive command rejected: {0}")]
    Rejected(String),

    #[error("Drive base disconnected")]
    Disconnected,
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Malformed(err.to_string())
    }
}

impl From<serde_json::Error> for LineqError {
    fn from(err: serde_json::Error) -> Self {
        LineqError::Storage(err.into())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<std::io::Error> for LineqError {
    fn from(err: std::io::Error) -> Self {
        LineqError::Storage(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LineqError::Storage(StorageError::UnknownAction("jump".to_string()));
        assert!(err.to_string().contains("jump"));
    }

    #[test]
    fn test_threshold_error() {
        let err = ConfigError::ThresholdOrder {
            black: 30.0,
            white: 25.0,
        };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("25"));
    }

    #[test]
    fn test_io_error_is_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LineqError = io.into();
        assert!(matches!(err, LineqError::Storage(StorageError::Io(_))));
    }

    #[test]
    fn test_every_error_names_its_subsystem() {
        let errors = [
            LineqError::Config(ConfigError::ThresholdOrder {
                black: 30.0,
                white: 25.0,
            }),
            LineqError::Storage(StorageError::NotFound("q_table.json".into())),
            LineqError::Sensor(SensorError::OutOfRange {
                sensor: "reflectance",
                value: -1.0,
                min: 0.0,
                max: 100.0,
            }),
            LineqError::Actuator(ActuatorError::Disconnected),
        ];
        for err in errors {
            let prefix = match &err {
                LineqError::Config(_) => "Configuration",
                LineqError::Storage(_) => "Storage",
                LineqError::Sensor(_) => "Sensor",
                LineqError::Actuator(_) => "Actuator",
            };
            assert!(err.to_string().starts_with(prefix), "{err}");
        }
    }
}
