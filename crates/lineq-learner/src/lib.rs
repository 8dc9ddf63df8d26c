//! # Lineq Learner
//!
//! Tabular Q-learning engine for a two-wheeled line follower.
//!
//! ## Update Rule
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α × (R + γ × max_a' Q(s',a') − Q(s,a))
//! ```
//!
//! Where:
//! - s: (tracking mode, light state) before the maneuver
//! - a: the maneuver taken
//! - s': (tracking mode, light state) after the maneuver
//! - α: learning rate, γ: discount factor
//!
//! ## Exploration
//!
//! The probability of a random maneuver decays as `base^(-iteration / temperature)`.
//! Learning stops once it falls below the stop threshold (0.01 by default).
//!
//! ## Sessions
//!
//! - [`LearningSession`]: explore/exploit, update the table, persist every cycle
//! - [`PolicyRunner`]: replay the persisted table read-only, dodge obstacles

pub mod classifier;
pub mod reward;
pub mod robot;
pub mod schedule;
pub mod session;
pub mod table;

use serde::{Deserialize, Serialize};

use lineq_common::{ConfigError, TrackingMode};

pub use classifier::infer_mode;
pub use reward::RewardPolicy;
pub use robot::{
    maneuver::{AvoidanceManeuver, LineRobot, ManeuverOutcome, MotionProfile},
    Actuator, Feedback, FeedbackError, NoopFeedback, Perception,
};
pub use schedule::ExplorationSchedule;
pub use session::{
    learning::{CycleReport, Decision, LearningSession, LoopState, Strategy},
    policy::{PolicyRunner, PolicyStep, RunSummary},
};
pub use table::{
    store::{InMemoryStore, JsonFileStore, TableRecord, TableSnapshot, TableStore},
    value_table::ValueTable,
};

/// Default learning rate (α)
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default discount factor (γ)
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;

/// Default base of the exploration decay
pub const DEFAULT_DECAY_BASE: f64 = 2.7321;

/// Default decay temperature, in iterations
pub const DEFAULT_DECAY_TEMPERATURE: f64 = 1000.0;

/// Exploration probability below which learning stops
pub const DEFAULT_STOP_THRESHOLD: f64 = 0.01;

/// Learner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in [0, 1]
    pub discount_factor: f64,
    /// Base of the exploration decay (> 1)
    pub decay_base: f64,
    /// Iterations per unit of decay exponent (> 0)
    pub temperature: f64,
    /// Stop once exploration probability drops below this
    pub stop_threshold: f64,
    /// Mode assumed before any transition is observed
    pub initial_mode: TrackingMode,
    /// Seed for the exploration RNG; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Reward shaping values
    pub reward: RewardPolicy,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            decay_base: DEFAULT_DECAY_BASE,
            temperature: DEFAULT_DECAY_TEMPERATURE,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
            initial_mode: TrackingMode::InnerLine,
            seed: None,
            reward: RewardPolicy::default(),
        }
    }
}

impl LearnerConfig {
    /// Reject parameters the update rule or schedule cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("learning_rate", self.learning_rate, "(0, 1]", |v| {
            v > 0.0 && v <= 1.0
        })?;
        check_range("discount_factor", self.discount_factor, "[0, 1]", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check_range("decay_base", self.decay_base, "> 1", |v| v > 1.0)?;
        check_range("temperature", self.temperature, "> 0", |v| v > 0.0)?;
        check_range("stop_threshold", self.stop_threshold, "(0, 1)", |v| {
            v > 0.0 && v < 1.0
        })?;
        Ok(())
    }

    /// Exploration schedule described by this config
    pub fn schedule(&self) -> ExplorationSchedule {
        ExplorationSchedule::new(self.decay_base, self.temperature, self.stop_threshold)
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    expected: &'static str,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LearnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_learning_rate() {
        let cfg = LearnerConfig {
            learning_rate: 0.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_rejects_flat_decay() {
        let cfg = LearnerConfig {
            decay_base: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = LearnerConfig {
            discount_factor: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
