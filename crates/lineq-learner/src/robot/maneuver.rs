//! Maneuvers - actuation routines bound to each [`Action`]
//!
//! Advance and reverse are timed bursts. Pivots turn in small steps,
//! re-sampling the light state after each one, and finish as soon as the
//! state differs from the one seen before the maneuver. That crisp
//! one-state-in / different-state-out behaviour is what the mode classifier
//! relies on.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lineq_common::{Action, LightState, Result, SensorError, Thresholds};

use super::{announce, Actuator, Feedback, Perception};

/// Speeds and time budgets for the four maneuvers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Advance speed (mm/s)
    pub advance_speed: f64,
    /// Reverse speed (mm/s, negative)
    pub reverse_speed: f64,
    /// Advance / reverse burst length (ms)
    pub burst_ms: u64,
    /// Creep speed while pivoting (mm/s)
    pub pivot_speed: f64,
    /// Pivot turn rate magnitude (deg/s)
    pub pivot_turn_rate: f64,
    /// Length of one pivot step (ms)
    pub pivot_step_ms: u64,
    /// Steps after which a pivot gives up waiting for a state change
    pub max_pivot_steps: u32,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            advance_speed: 100.0,
            reverse_speed: -100.0,
            burst_ms: 250,
            pivot_speed: 10.0,
            pivot_turn_rate: 110.0,
            pivot_step_ms: 100,
            max_pivot_steps: 300,
        }
    }
}

/// Fixed obstacle-avoidance routine: back off, then turn away
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvoidanceManeuver {
    /// Obstacle signal fires when distance is strictly below this
    pub distance_threshold: f64,
    pub reverse_speed: f64,
    pub reverse_ms: u64,
    pub turn_rate: f64,
    pub turn_ms: u64,
}

impl Default for AvoidanceManeuver {
    fn default() -> Self {
        Self {
            distance_threshold: 20.0,
            reverse_speed: -80.0,
            reverse_ms: 1000,
            turn_rate: 100.0,
            turn_ms: 8000,
        }
    }
}

/// Accepted raw sensor ranges; readings outside are sensor faults
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorLimits {
    pub light_min: f64,
    pub light_max: f64,
    pub distance_min: f64,
    pub distance_max: f64,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            light_min: 0.0,
            light_max: 100.0,
            distance_min: 0.0,
            distance_max: 100.0,
        }
    }
}

/// What a maneuver did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManeuverOutcome {
    pub action: Action,
    pub before: LightState,
    /// Light state when the maneuver returned
    pub after: LightState,
    /// Drive commands issued (1 for bursts)
    pub steps: u32,
    /// Pivot hit `max_pivot_steps` without a state change
    pub timed_out: bool,
}

/// Drive base plus sensors, with the learner's thresholds applied
pub struct LineRobot<A, P> {
    actuator: A,
    perception: P,
    thresholds: Thresholds,
    motion: MotionProfile,
    avoidance: AvoidanceManeuver,
    limits: SensorLimits,
}

impl<A: Actuator, P: Perception> LineRobot<A, P> {
    pub fn new(actuator: A, perception: P, thresholds: Thresholds) -> Self {
        Self {
            actuator,
            perception,
            thresholds,
            motion: MotionProfile::default(),
            avoidance: AvoidanceManeuver::default(),
            limits: SensorLimits::default(),
        }
    }

    pub fn with_motion(mut self, motion: MotionProfile) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_avoidance(mut self, avoidance: AvoidanceManeuver) -> Self {
        self.avoidance = avoidance;
        self
    }

    pub fn with_limits(mut self, limits: SensorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn perception(&self) -> &P {
        &self.perception
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Sample and classify the reflectance sensor
    pub fn light_state(&mut self) -> Result<LightState> {
        let reading = self.perception.read_light_level()?;
        check_reading(
            "reflectance",
            reading,
            self.limits.light_min,
            self.limits.light_max,
        )?;
        Ok(self.thresholds.classify(reading))
    }

    /// Poll the proximity sensor once
    pub fn obstacle_ahead(&mut self) -> Result<bool> {
        let distance = self.perception.read_obstacle_distance()?;
        check_reading(
            "proximity",
            distance,
            self.limits.distance_min,
            self.limits.distance_max,
        )?;
        Ok(distance < self.avoidance.distance_threshold)
    }

    /// Run the routine bound to `action`, blocking until its exit contract holds
    ///
    /// `before` is the light state observed just before the call; pivots
    /// turn until the sensor reports something else.
    pub fn perform(&mut self, action: Action, before: LightState) -> Result<ManeuverOutcome> {
        match action {
            Action::Advance => self.burst(action, before, self.motion.advance_speed),
            Action::Reverse => self.burst(action, before, self.motion.reverse_speed),
            Action::PivotLeft => self.pivot(action, before, -self.motion.pivot_turn_rate),
            Action::PivotRight => self.pivot(action, before, self.motion.pivot_turn_rate),
        }
    }

    fn burst(&mut self, action: Action, before: LightState, speed: f64) -> Result<ManeuverOutcome> {
        self.actuator
            .drive_for(speed, 0.0, Duration::from_millis(self.motion.burst_ms))?;
        Ok(ManeuverOutcome {
            action,
            before,
            after: self.light_state()?,
            steps: 1,
            timed_out: false,
        })
    }

    fn pivot(&mut self, action: Action, before: LightState, turn_rate: f64) -> Result<ManeuverOutcome> {
        let step = Duration::from_millis(self.motion.pivot_step_ms);
        let mut steps = 0u32;
        let mut after = self.light_state()?;

        while after == before {
            if steps >= self.motion.max_pivot_steps {
                warn!(
                    action = %action,
                    light = %before,
                    steps,
                    "pivot gave up waiting for a light change"
                );
                self.actuator.stop()?;
                return Ok(ManeuverOutcome {
                    action,
                    before,
                    after,
                    steps,
                    timed_out: true,
                });
            }
            self.actuator
                .drive_for(self.motion.pivot_speed, turn_rate, step)?;
            steps += 1;
            after = self.light_state()?;
        }

        debug!(action = %action, from = %before, to = %after, steps, "pivot finished");
        Ok(ManeuverOutcome {
            action,
            before,
            after,
            steps,
            timed_out: false,
        })
    }

    /// Stop, announce, back off and turn away
    pub fn avoid_obstacle<F: Feedback + ?Sized>(&mut self, feedback: &mut F) -> Result<()> {
        self.actuator.stop()?;
        announce(feedback, "An obstacle detected.");
        announce(feedback, "Turning back.");

        let a = &self.avoidance;
        self.actuator.drive_for(
            a.reverse_speed,
            0.0,
            Duration::from_millis(a.reverse_ms),
        )?;
        self.actuator
            .drive_for(0.0, a.turn_rate, Duration::from_millis(a.turn_ms))?;
        Ok(())
    }

    pub fn halt(&mut self) -> Result<()> {
        self.actuator.stop()?;
        Ok(())
    }
}

fn check_reading(sensor: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SensorError::OutOfRange {
            sensor,
            value,
            min,
            max,
        }
        .into())
    }
}
