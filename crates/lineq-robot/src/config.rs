//! Robot runtime configuration
//!
//! Defaults reproduce the tuned constants of the reference robot; any of the
//! `LINEQ_*` variables (from the environment or a `.env` file) override them.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lineq_common::{ConfigError, Thresholds, DEFAULT_BLACK_THRESHOLD, DEFAULT_WHITE_THRESHOLD};
use lineq_learner::{AvoidanceManeuver, LearnerConfig, MotionProfile};

use crate::sim::SimSettings;

/// Robot runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Learn a fresh table before following the line
    pub training: bool,
    pub storage: StorageSettings,
    pub thresholds: ThresholdSettings,
    pub learner: LearnerConfig,
    pub motion: MotionProfile,
    pub obstacle: AvoidanceManeuver,
    pub sim: SimSettings,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            training: false,
            storage: StorageSettings::default(),
            thresholds: ThresholdSettings::default(),
            learner: LearnerConfig::default(),
            motion: MotionProfile::default(),
            obstacle: AvoidanceManeuver::default(),
            sim: SimSettings::default(),
        }
    }
}

/// Value table location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub table_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(crate::DEFAULT_TABLE_PATH),
        }
    }
}

/// Raw reflectance cut-offs, validated into [`Thresholds`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSettings {
    pub white: f64,
    pub black: f64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            white: DEFAULT_WHITE_THRESHOLD,
            black: DEFAULT_BLACK_THRESHOLD,
        }
    }
}

impl RobotConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LINEQ_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(v) = lookup("LINEQ_TRAINING") {
            cfg.training = parse_bool("LINEQ_TRAINING", &v)?;
        }
        if let Some(v) = lookup("LINEQ_TABLE_PATH") {
            cfg.storage.table_path = PathBuf::from(v);
        }

        // Thresholds
        override_with(&lookup, "LINEQ_WHITE_THRESHOLD", &mut cfg.thresholds.white)?;
        override_with(&lookup, "LINEQ_BLACK_THRESHOLD", &mut cfg.thresholds.black)?;

        // Learning settings
        override_with(&lookup, "LINEQ_LEARNING_RATE", &mut cfg.learner.learning_rate)?;
        override_with(&lookup, "LINEQ_DISCOUNT_FACTOR", &mut cfg.learner.discount_factor)?;
        override_with(&lookup, "LINEQ_DECAY_BASE", &mut cfg.learner.decay_base)?;
        override_with(&lookup, "LINEQ_DECAY_TEMPERATURE", &mut cfg.learner.temperature)?;
        override_with(&lookup, "LINEQ_STOP_THRESHOLD", &mut cfg.learner.stop_threshold)?;
        if let Some(v) = lookup("LINEQ_SEED") {
            cfg.learner.seed = Some(parse_value("LINEQ_SEED", &v)?);
        }

        // Motion and obstacle settings
        override_with(&lookup, "LINEQ_OBSTACLE_DISTANCE", &mut cfg.obstacle.distance_threshold)?;
        override_with(&lookup, "LINEQ_MAX_PIVOT_STEPS", &mut cfg.motion.max_pivot_steps)?;

        // Simulator settings
        override_with(&lookup, "LINEQ_SIM_TIME_SCALE", &mut cfg.sim.time_scale)?;
        if let Some(v) = lookup("LINEQ_SIM_OBSTACLE_SPACING") {
            cfg.sim.obstacle_spacing = match v.as_str() {
                "" | "none" => None,
                _ => Some(parse_value("LINEQ_SIM_OBSTACLE_SPACING", &v)?),
            };
        }

        Ok(cfg)
    }

    /// Check every numeric invariant; returns the validated thresholds
    pub fn validate(&self) -> Result<Thresholds, ConfigError> {
        let thresholds = Thresholds::new(self.thresholds.white, self.thresholds.black)?;
        self.learner.validate()?;

        if self.motion.max_pivot_steps == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_pivot_steps",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if !(self.obstacle.distance_threshold > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "obstacle_distance",
                value: self.obstacle.distance_threshold,
                expected: "> 0",
            });
        }
        if let Some(spacing) = self.sim.obstacle_spacing {
            // A freshly placed obstacle must start out of avoidance range
            if !(spacing * self.sim.distance_scale >= self.obstacle.distance_threshold) {
                return Err(ConfigError::OutOfRange {
                    name: "sim_obstacle_spacing",
                    value: spacing,
                    expected: ">= obstacle_distance / distance_scale",
                });
            }
        }
        if !(self.sim.time_scale >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "sim_time_scale",
                value: self.sim.time_scale,
                expected: ">= 0",
            });
        }
        Ok(thresholds)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidOverride {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn override_with<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = lookup(key) {
        *slot = parse_value(key, &raw)?;
    }
    Ok(())
}
