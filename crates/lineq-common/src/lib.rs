//! # Lineq Common
//!
//! Shared types and errors for the Lineq line-following learner.
//!
//! ## Core Types
//!
//! - [`LightState`]: discretized reflectance reading (white / middle / black)
//! - [`Thresholds`]: the reflectance cut-offs that produce a [`LightState`]
//! - [`TrackingMode`]: which edge of the line the robot is straddling
//! - [`Action`]: the closed set of four maneuvers
//! - [`Direction`]: direction of travel implied by an [`Action`]
//!
//! ## Errors
//!
//! - [`LineqError`]: unified error with configuration, storage, sensor and
//!   actuator variants

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ActuatorError, ConfigError, LineqError, Result, SensorError, StorageError};
pub use types::{
    action::{Action, Direction},
    light::{LightState, Thresholds},
    mode::TrackingMode,
};

/// Lineq version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reflectance at or above which the sensor sees white
pub const DEFAULT_WHITE_THRESHOLD: f64 = 25.0;

/// Reflectance at or below which the sensor sees black
pub const DEFAULT_BLACK_THRESHOLD: f64 = 8.0;

/// Number of entries in a full value table (modes × light states × actions)
pub const TABLE_SIZE: usize = TrackingMode::ALL.len() * LightState::ALL.len() * Action::ALL.len();
