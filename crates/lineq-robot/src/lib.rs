//! # Lineq Robot
//!
//! Runtime for the line-following controller: configuration, a simulated
//! track rig, tracing-backed operator feedback and the train-then-run driver.

pub mod config;
pub mod feedback;
pub mod runtime;
pub mod sim;

pub use config::RobotConfig;
pub use feedback::TracingFeedback;
pub use runtime::{build_robot, follow, run, train};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where the value table lives unless `LINEQ_TABLE_PATH` says otherwise
pub const DEFAULT_TABLE_PATH: &str = "q_table.json";
