//! Train-then-run driver
//!
//! [`train`] and [`follow`] work with any rig; [`run`] wires them to the
//! simulated track.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use lineq_common::{Result, Thresholds};
use lineq_learner::{
    Actuator, Feedback, JsonFileStore, LearningSession, LineRobot, Perception, PolicyRunner,
    RunSummary, TableStore, ValueTable,
};

use crate::config::RobotConfig;
use crate::feedback::TracingFeedback;
use crate::sim::{self, SimDrive, SimSensors, SimSettings};

/// Wrap a rig in a robot tuned by `config`
pub fn build_robot<A: Actuator, P: Perception>(
    config: &RobotConfig,
    thresholds: Thresholds,
    actuator: A,
    perception: P,
) -> LineRobot<A, P> {
    LineRobot::new(actuator, perception, thresholds)
        .with_motion(config.motion.clone())
        .with_avoidance(config.obstacle.clone())
}

/// Learn a table from scratch and persist it
pub fn train<A, P, F, S>(
    config: &RobotConfig,
    robot: &mut LineRobot<A, P>,
    feedback: &mut F,
    store: &S,
    stop: &AtomicBool,
) -> Result<ValueTable>
where
    A: Actuator,
    P: Perception,
    F: Feedback + ?Sized,
    S: TableStore + ?Sized,
{
    let light = robot.light_state()?;
    let session = LearningSession::new(&config.learner, light)?;
    session.run(robot, feedback, store, stop)
}

/// Load the persisted table, align on the line and follow it until `stop`
pub fn follow<A, P, F, S>(
    config: &RobotConfig,
    robot: &mut LineRobot<A, P>,
    feedback: &mut F,
    store: &S,
    stop: &AtomicBool,
) -> Result<RunSummary>
where
    A: Actuator,
    P: Perception,
    F: Feedback + ?Sized,
    S: TableStore + ?Sized,
{
    let light = robot.light_state()?;
    let mut runner = PolicyRunner::load(store, config.learner.initial_mode, light)?;
    runner.align(robot)?;
    runner.run(robot, feedback, stop)
}

/// Full controller lifecycle on the simulated track
///
/// Training runs without obstacles; they are only placed for line following.
pub fn run(config: &RobotConfig, stop: &AtomicBool) -> Result<()> {
    let thresholds = config.validate()?;
    let store = JsonFileStore::new(&config.storage.table_path);
    let mut feedback = TracingFeedback;

    if config.training {
        let (drive, sensors) = sim::rig(SimSettings {
            obstacle_spacing: None,
            ..config.sim.clone()
        });
        let mut robot = build_robot(config, thresholds, drive, sensors);
        train(config, &mut robot, &mut feedback, &store, stop)?;
        if stop.load(Ordering::Relaxed) {
            return Ok(());
        }
    }

    let (drive, sensors): (SimDrive, SimSensors) = sim::rig(config.sim.clone());
    let mut robot = build_robot(config, thresholds, drive, sensors);
    let summary = follow(config, &mut robot, &mut feedback, &store, stop)?;
    info!(
        cycles = summary.cycles,
        avoidances = summary.avoidances,
        travel_mm = robot.actuator().snapshot().travel(),
        "controller finished"
    );
    Ok(())
}
