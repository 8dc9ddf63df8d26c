//! Simulated track rig
//!
//! [`SimDrive`] and [`SimSensors`] share one [`TrackWorld`] and stand in for
//! the drive base and the sensors. Simulated time only advances inside
//! `drive_for`.

mod track;

pub use track::{SimSettings, TrackWorld, OPEN_DISTANCE};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lineq_common::{ActuatorError, SensorError};
use lineq_learner::{Actuator, Perception};

/// Build a drive/sensor pair over a fresh world
pub fn rig(settings: SimSettings) -> (SimDrive, SimSensors) {
    rig_from(TrackWorld::new(settings))
}

/// Build a drive/sensor pair over an existing world
pub fn rig_from(world: TrackWorld) -> (SimDrive, SimSensors) {
    let world = Rc::new(RefCell::new(world));
    (
        SimDrive {
            world: Rc::clone(&world),
        },
        SimSensors { world },
    )
}

pub struct SimDrive {
    world: Rc<RefCell<TrackWorld>>,
}

impl SimDrive {
    /// Copy of the current world state
    pub fn snapshot(&self) -> TrackWorld {
        self.world.borrow().clone()
    }
}

impl Actuator for SimDrive {
    fn drive(&mut self, speed: f64, turn_rate: f64) -> Result<(), ActuatorError> {
        if !speed.is_finite() || !turn_rate.is_finite() {
            return Err(ActuatorError::Rejected(format!(
                "non-finite command speed={speed} turn_rate={turn_rate}"
            )));
        }
        self.world.borrow_mut().command(speed, turn_rate);
        Ok(())
    }

    fn drive_for(
        &mut self,
        speed: f64,
        turn_rate: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        self.drive(speed, turn_rate)?;
        let pace = {
            let mut world = self.world.borrow_mut();
            world.integrate(duration);
            world.settings().time_scale
        };
        if pace > 0.0 {
            std::thread::sleep(duration.mul_f64(pace));
        }
        self.stop()
    }

    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.world.borrow_mut().command(0.0, 0.0);
        Ok(())
    }
}

pub struct SimSensors {
    world: Rc<RefCell<TrackWorld>>,
}

impl Perception for SimSensors {
    fn read_light_level(&mut self) -> Result<f64, SensorError> {
        Ok(self.world.borrow().reflectance())
    }

    fn read_obstacle_distance(&mut self) -> Result<f64, SensorError> {
        Ok(self.world.borrow().proximity())
    }
}
