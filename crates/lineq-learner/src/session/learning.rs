//! Learning session - explore/exploit Q-learning against the real track
//!
//! ```text
//!   RUNNING ──(p(iteration) < stop threshold, or stop flag)──▶ STOPPED
//! ```
//!
//! Each RUNNING cycle: choose (random with probability p, else greedy),
//! maneuver, observe, classify mode, reward, update, persist.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

use lineq_common::{Action, LightState, Result, TrackingMode};

use crate::classifier::infer_mode;
use crate::reward::RewardPolicy;
use crate::robot::maneuver::LineRobot;
use crate::robot::{show, Actuator, Feedback, Perception};
use crate::schedule::ExplorationSchedule;
use crate::table::{TableStore, ValueTable};
use crate::LearnerConfig;

/// How an action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Uniformly random action
    Explore,
    /// Best known action
    Exploit,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Explore => f.write_str("Random"),
            Strategy::Exploit => f.write_str("Greedy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Everything observed in one learning cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub iteration: u64,
    pub exploration: f64,
    pub decision: Decision,
    pub mode: TrackingMode,
    pub light: LightState,
    pub next_mode: TrackingMode,
    pub next_light: LightState,
    pub reward: f64,
    /// Table value for (mode, light, action) after the update
    pub value: f64,
    pub pivot_timed_out: bool,
}

impl CycleReport {
    fn display_lines(&self) -> Vec<String> {
        vec![
            self.iteration.to_string(),
            format!("{:.4}", self.exploration),
            self.decision.strategy.to_string(),
            self.decision.action.to_string(),
            self.reward.to_string(),
        ]
    }
}

/// One learning run, owning the table it trains
pub struct LearningSession<R = StdRng> {
    id: Uuid,
    table: ValueTable,
    learning_rate: f64,
    discount_factor: f64,
    schedule: ExplorationSchedule,
    reward: RewardPolicy,
    mode: TrackingMode,
    light: LightState,
    iteration: u64,
    rng: R,
}

impl LearningSession<StdRng> {
    /// Fresh all-zero session starting from the sampled light state
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: &LearnerConfig, light: LightState) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, light, rng)
    }
}

impl<R: Rng> LearningSession<R> {
    pub fn with_rng(config: &LearnerConfig, light: LightState, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: Uuid::now_v7(),
            table: ValueTable::new(),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            schedule: config.schedule(),
            reward: config.reward,
            mode: config.initial_mode,
            light,
            iteration: 0,
            rng,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn light(&self) -> LightState {
        self.light
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn exploration_probability(&self) -> f64 {
        self.schedule.probability(self.iteration)
    }

    pub fn state(&self) -> LoopState {
        if self.schedule.exhausted(self.iteration) {
            LoopState::Stopped
        } else {
            LoopState::Running
        }
    }

    /// Epsilon-greedy choice with the scheduled exploration probability
    pub fn select_action(&mut self) -> Decision {
        if self.rng.gen::<f64>() < self.exploration_probability() {
            let action = Action::ALL[self.rng.gen_range(0..Action::ALL.len())];
            Decision {
                action,
                strategy: Strategy::Explore,
            }
        } else {
            let (action, _) = self.table.best_action(self.mode, self.light);
            Decision {
                action,
                strategy: Strategy::Exploit,
            }
        }
    }

    /// Perform a chosen action and learn from what it did
    ///
    /// The update is keyed on the pre-action (mode, light, action); the
    /// lookahead uses the post-action mode and light state.
    pub fn execute<A: Actuator, P: Perception>(
        &mut self,
        decision: Decision,
        robot: &mut LineRobot<A, P>,
    ) -> Result<CycleReport> {
        let exploration = self.exploration_probability();
        let action = decision.action;

        let outcome = robot.perform(action, self.light)?;
        let next_light = robot.light_state()?;
        let next_mode = infer_mode(self.light, next_light, action, self.mode);
        let reward = self.reward.reward(next_light, action.direction());

        let value = self.table.update(
            self.mode,
            self.light,
            action,
            reward,
            next_mode,
            next_light,
            self.learning_rate,
            self.discount_factor,
        );

        let report = CycleReport {
            iteration: self.iteration,
            exploration,
            decision,
            mode: self.mode,
            light: self.light,
            next_mode,
            next_light,
            reward,
            value,
            pivot_timed_out: outcome.timed_out,
        };

        self.mode = next_mode;
        self.light = next_light;
        self.iteration += 1;
        Ok(report)
    }

    /// One full cycle: choose, act, learn, report, persist
    pub fn step<A, P, F, S>(
        &mut self,
        robot: &mut LineRobot<A, P>,
        feedback: &mut F,
        store: &S,
    ) -> Result<CycleReport>
    where
        A: Actuator,
        P: Perception,
        F: Feedback + ?Sized,
        S: TableStore + ?Sized,
    {
        let decision = self.select_action();
        let report = self.execute(decision, robot)?;

        debug!(
            iteration = report.iteration,
            strategy = %decision.strategy,
            action = %decision.action,
            mode = %report.mode,
            light = %report.light,
            next_mode = %report.next_mode,
            next_light = %report.next_light,
            reward = report.reward,
            value = report.value,
            "learning cycle"
        );
        show(feedback, report.display_lines());

        store.save(&self.table, Some(self.id))?;
        Ok(report)
    }

    /// Run until the schedule is exhausted or `stop` is raised
    ///
    /// The table is persisted after every cycle and once more on exit.
    pub fn run<A, P, F, S>(
        mut self,
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
        info!(
            session = %self.id,
            mode = %self.mode,
            light = %self.light,
            planned_iterations = self.schedule.stop_iteration(),
            "learning session started"
        );

        while self.state() == LoopState::Running {
            if stop.load(Ordering::Relaxed) {
                info!(iteration = self.iteration, "learning interrupted");
                break;
            }
            self.step(robot, feedback, store)?;
        }

        robot.halt()?;
        store.save(&self.table, Some(self.id))?;
        info!(
            session = %self.id,
            iterations = self.iteration,
            exploration = self.exploration_probability(),
            "learning session stopped"
        );
        Ok(self.table)
    }
}
