//! Robot capabilities
//!
//! The learner never touches hardware directly. It drives through
//! [`Actuator`], senses through [`Perception`], and reports through
//! [`Feedback`]. Speeds are mm/s, turn rates are deg/s (positive turns right).

pub mod maneuver;

use std::time::Duration;

use lineq_common::{ActuatorError, SensorError};

/// Drive base capability
#[cfg_attr(test, mockall::automock)]
pub trait Actuator {
    /// Start driving; returns immediately and keeps driving until the next command
    fn drive(&mut self, speed: f64, turn_rate: f64) -> Result<(), ActuatorError>;

    /// Drive for `duration`, then stop. Blocks.
    fn drive_for(
        &mut self,
        speed: f64,
        turn_rate: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        self.drive(speed, turn_rate)?;
        std::thread::sleep(duration);
        self.stop()
    }

    fn stop(&mut self) -> Result<(), ActuatorError>;
}

/// Raw sensor capability
#[cfg_attr(test, mockall::automock)]
pub trait Perception {
    /// Reflectance under the line sensor
    fn read_light_level(&mut self) -> Result<f64, SensorError>;

    /// Distance reported by the forward proximity sensor
    fn read_obstacle_distance(&mut self) -> Result<f64, SensorError>;
}

/// Failure to render operator feedback; never fatal
#[derive(Debug, thiserror::Error)]
#[error("Feedback unavailable: {0}")]
pub struct FeedbackError(pub String);

/// On-device display / speech
#[cfg_attr(test, mockall::automock)]
pub trait Feedback {
    /// Replace the display contents with `lines`
    fn display(&mut self, lines: &[String]) -> Result<(), FeedbackError>;

    /// Speak a short phrase
    fn say(&mut self, phrase: &str) -> Result<(), FeedbackError>;
}

/// Feedback sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn display(&mut self, _lines: &[String]) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn say(&mut self, _phrase: &str) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Render feedback, logging instead of failing
pub(crate) fn show<F: Feedback + ?Sized>(feedback: &mut F, lines: Vec<String>) {
    if let Err(e) = feedback.display(&lines) {
        tracing::debug!(error = %e, "display feedback dropped");
    }
}

/// Speak, logging instead of failing
pub(crate) fn announce<F: Feedback + ?Sized>(feedback: &mut F, phrase: &str) {
    if let Err(e) = feedback.say(phrase) {
        tracing::debug!(error = %e, phrase, "speech feedback dropped");
    }
}
