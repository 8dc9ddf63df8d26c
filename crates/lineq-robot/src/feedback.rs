//! Operator feedback rendered as tracing events

use tracing::info;

use lineq_learner::{Feedback, FeedbackError};

/// Writes display and speech requests to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn display(&mut self, lines: &[String]) -> Result<(), FeedbackError> {
        info!(target: "lineq::display", "{}", lines.join(" | "));
        Ok(())
    }

    fn say(&mut self, phrase: &str) -> Result<(), FeedbackError> {
        info!(target: "lineq::speech", "{phrase}");
        Ok(())
    }
}
