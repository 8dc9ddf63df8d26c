//! Learning and policy-execution sessions
pub mod learning;
pub mod policy;

pub use self::learning::{CycleReport, Decision, LearningSession, LoopState, Strategy};
pub use self::policy::{PolicyRunner, PolicyStep, RunSummary};
