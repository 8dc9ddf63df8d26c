//! Policy runner - follow the line with a learned table
//!
//! The table is loaded once and only read. Each cycle either dodges an
//! obstacle or takes the greedy action for the current (mode, light state).

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use lineq_common::{Action, LightState, Result, TrackingMode};

use crate::classifier::infer_mode;
use crate::robot::maneuver::LineRobot;
use crate::robot::{show, Actuator, Feedback, Perception};
use crate::table::{TableStore, ValueTable};

/// Outcome of one policy cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyStep {
    /// Obstacle seen; the avoidance maneuver ran instead of the policy
    Avoided,
    /// Greedy action taken
    ///
    /// `value` is the table entry the action was chosen on; `mode` and
    /// `light` are the state observed *after* the action ran.
    Followed {
        action: Action,
        value: f64,
        mode: TrackingMode,
        light: LightState,
    },
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub avoidances: u64,
}

pub struct PolicyRunner {
    table: ValueTable,
    mode: TrackingMode,
    light: LightState,
    summary: RunSummary,
}

impl PolicyRunner {
    pub fn new(table: ValueTable, mode: TrackingMode, light: LightState) -> Self {
        Self {
            table,
            mode,
            light,
            summary: RunSummary::default(),
        }
    }

    /// Load the persisted table; a missing or malformed table is fatal
    pub fn load<S: TableStore + ?Sized>(
        store: &S,
        mode: TrackingMode,
        light: LightState,
    ) -> Result<Self> {
        let table = store.load()?;
        Ok(Self::new(table, mode, light))
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn light(&self) -> LightState {
        self.light
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Pivot right once to find an edge and seed the tracking mode
    pub fn align<A: Actuator, P: Perception>(
        &mut self,
        robot: &mut LineRobot<A, P>,
    ) -> Result<TrackingMode> {
        self.advance(robot, Action::PivotRight)?;
        info!(mode = %self.mode, light = %self.light, "aligned on line");
        Ok(self.mode)
    }

    /// One control cycle
    ///
    /// The obstacle signal is polled before the policy is consulted; an
    /// obstacle that appears mid-maneuver is only seen on the next cycle.
    pub fn step<A, P, F>(
        &mut self,
        robot: &mut LineRobot<A, P>,
        feedback: &mut F,
    ) -> Result<PolicyStep>
    where
        A: Actuator,
        P: Perception,
        F: Feedback + ?Sized,
    {
        if robot.obstacle_ahead()? {
            info!("obstacle ahead");
            robot.avoid_obstacle(feedback)?;
            self.light = robot.light_state()?;
            self.summary.avoidances += 1;
            return Ok(PolicyStep::Avoided);
        }

        let (action, value) = self.table.best_action(self.mode, self.light);
        show(feedback, vec!["Following the line..!".to_string()]);
        self.advance(robot, action)?;
        self.summary.cycles += 1;

        Ok(PolicyStep::Followed {
            action,
            value,
            mode: self.mode,
            light: self.light,
        })
    }

    /// Follow the line until `stop` is raised
    pub fn run<A, P, F>(
        &mut self,
        robot: &mut LineRobot<A, P>,
        feedback: &mut F,
        stop: &AtomicBool,
    ) -> Result<RunSummary>
    where
        A: Actuator,
        P: Perception,
        F: Feedback + ?Sized,
    {
        info!(mode = %self.mode, light = %self.light, "line following started");
        while !stop.load(Ordering::Relaxed) {
            self.step(robot, feedback)?;
        }
        robot.halt()?;
        info!(
            cycles = self.summary.cycles,
            avoidances = self.summary.avoidances,
            "line following stopped"
        );
        Ok(self.summary)
    }

    fn advance<A: Actuator, P: Perception>(
        &mut self,
        robot: &mut LineRobot<A, P>,
        action: Action,
    ) -> Result<()> {
        robot.perform(action, self.light)?;
        let next_light = robot.light_state()?;
        let next_mode = infer_mode(self.light, next_light, action, self.mode);
        debug!(
            action = %action,
            mode = %self.mode,
            light = %self.light,
            next_mode = %next_mode,
            next_light = %next_light,
            "policy cycle"
        );
        self.mode = next_mode;
        self.light = next_light;
        Ok(())
    }
}
