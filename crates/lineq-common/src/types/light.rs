//! LightState - discretized reflectance under the line sensor
//!
//! The raw reflectance reading is partitioned by two thresholds:
//!
//! ```text
//!  0 ─── black ───────── white ─── 100
//!  BLACK │     MIDDLE      │ WHITE
//! ```
//!
//! Both boundaries are inclusive on the outer side: a reading equal to the
//! white threshold is WHITE, a reading equal to the black threshold is BLACK.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Discretized light state seen by the reflectance sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightState {
    White,
    Middle,
    Black,
}

impl LightState {
    /// All light states in table order
    pub const ALL: [LightState; 3] = [LightState::White, LightState::Middle, LightState::Black];

    /// Stable symbolic name used in persisted tables and logs
    pub const fn name(self) -> &'static str {
        match self {
            LightState::White => "WHITE",
            LightState::Middle => "MIDDLE",
            LightState::Black => "BLACK",
        }
    }

    /// Parse a stable symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Dense index into per-state arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reflectance cut-offs
///
/// Invariant: `black < white`, enforced by [`Thresholds::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    white: f64,
    black: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            white: crate::DEFAULT_WHITE_THRESHOLD,
            black: crate::DEFAULT_BLACK_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Create thresholds, rejecting `black >= white` (and NaN)
    pub fn new(white: f64, black: f64) -> Result<Self, ConfigError> {
        // Written so that NaN on either side fails too.
        if !(black < white) {
            return Err(ConfigError::ThresholdOrder { black, white });
        }
        Ok(Self { white, black })
    }

    pub fn white(&self) -> f64 {
        self.white
    }

    pub fn black(&self) -> f64 {
        self.black
    }

    /// Map a reflectance reading to exactly one light state
    pub fn classify(&self, reading: f64) -> LightState {
        if reading >= self.white {
            LightState::White
        } else if reading <= self.black {
            LightState::Black
        } else {
            LightState::Middle
        }
    }
}
