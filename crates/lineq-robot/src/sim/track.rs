//! Kinematic track model
//!
//! A single straight line runs along the track; lateral offset `y` is
//! measured from its centre, positive to the right. Heading is degrees from
//! the line direction, positive clockwise. The line's own curvature shows up
//! as heading drift proportional to distance travelled.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Integration step
const SUBSTEP_MS: u64 = 10;

/// Spin while stationary needed before a blocking obstacle counts as cleared
const CLEAR_SPIN_DEG: f64 = 180.0;

/// Reported by the proximity sensor when nothing is in range
pub const OPEN_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    /// Width of the painted line (mm)
    pub line_width_mm: f64,
    /// Width of the grey ramp straddling each edge (mm)
    pub edge_blur_mm: f64,
    pub black_reflectance: f64,
    pub white_reflectance: f64,
    /// Reflectance sensor distance ahead of the axle (mm)
    pub sensor_offset_mm: f64,
    /// Heading drift per mm travelled (deg/mm)
    pub curvature_deg_per_mm: f64,
    /// Forward travel between obstacles (mm); `None` disables them
    pub obstacle_spacing: Option<f64>,
    /// Proximity units per mm
    pub distance_scale: f64,
    /// Wall-clock fraction slept per simulated second; 0 runs flat out
    pub time_scale: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            line_width_mm: 20.0,
            edge_blur_mm: 16.0,
            black_reflectance: 4.0,
            white_reflectance: 40.0,
            sensor_offset_mm: 40.0,
            curvature_deg_per_mm: 0.02,
            obstacle_spacing: Some(3000.0),
            distance_scale: 0.1,
            time_scale: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackWorld {
    settings: SimSettings,
    y: f64,
    heading: f64,
    /// Cumulative forward travel (mm)
    travel: f64,
    speed: f64,
    turn_rate: f64,
    next_obstacle: Option<f64>,
    spin: f64,
    obstacles_cleared: u32,
    /// Travel at the last clearance; the next one needs forward progress first
    last_clear: Option<f64>,
}

impl TrackWorld {
    /// Robot centred on the line, facing along it
    pub fn new(settings: SimSettings) -> Self {
        let next_obstacle = settings.obstacle_spacing;
        Self {
            settings,
            y: 0.0,
            heading: 0.0,
            travel: 0.0,
            speed: 0.0,
            turn_rate: 0.0,
            next_obstacle,
            spin: 0.0,
            obstacles_cleared: 0,
            last_clear: None,
        }
    }

    /// Place the robot at a lateral offset and heading
    pub fn with_pose(mut self, y: f64, heading: f64) -> Self {
        self.y = y;
        self.heading = wrap_degrees(heading);
        self
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn offset(&self) -> f64 {
        self.y
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn travel(&self) -> f64 {
        self.travel
    }

    pub fn obstacles_cleared(&self) -> u32 {
        self.obstacles_cleared
    }

    pub fn command(&mut self, speed: f64, turn_rate: f64) {
        self.speed = speed;
        self.turn_rate = turn_rate;
    }

    /// Advance the model by `duration` under the current command
    pub fn integrate(&mut self, duration: Duration) {
        let total = duration.as_millis() as u64;
        let mut elapsed = 0;
        while elapsed < total {
            let ms = SUBSTEP_MS.min(total - elapsed);
            self.substep(ms as f64 / 1000.0);
            elapsed += ms;
        }
    }

    fn substep(&mut self, dt: f64) {
        let mut distance = self.speed * dt;
        if let Some(obstacle) = self.next_obstacle {
            if distance > 0.0 && self.travel + distance > obstacle {
                distance = (obstacle - self.travel).max(0.0);
            }
        }

        let turned = self.turn_rate * dt;
        if distance == 0.0 {
            self.spin += turned.abs();
        } else {
            self.spin = 0.0;
        }

        self.heading = wrap_degrees(
            self.heading + turned + self.settings.curvature_deg_per_mm * distance.abs(),
        );
        self.y += distance * self.heading.to_radians().sin();
        if distance > 0.0 {
            self.travel += distance;
        }

        let progressed = self.last_clear.map_or(true, |at| self.travel > at);
        if progressed && self.spin >= CLEAR_SPIN_DEG && self.proximity() < OPEN_DISTANCE {
            self.obstacles_cleared += 1;
            self.last_clear = Some(self.travel);
            self.next_obstacle = self.settings.obstacle_spacing.map(|s| self.travel + s);
            self.spin = 0.0;
        }
    }

    /// Reflectance under the sensor
    pub fn reflectance(&self) -> f64 {
        let s = &self.settings;
        let sensor_y = self.y + s.sensor_offset_mm * self.heading.to_radians().sin();
        let from_centre = sensor_y.abs();
        let half = s.line_width_mm / 2.0;
        let inner = half - s.edge_blur_mm / 2.0;
        let outer = half + s.edge_blur_mm / 2.0;

        if from_centre <= inner {
            s.black_reflectance
        } else if from_centre >= outer {
            s.white_reflectance
        } else {
            let t = (from_centre - inner) / (outer - inner);
            s.black_reflectance + t * (s.white_reflectance - s.black_reflectance)
        }
    }

    /// Proximity reading towards the next obstacle
    pub fn proximity(&self) -> f64 {
        match self.next_obstacle {
            Some(obstacle) => ((obstacle - self.travel) * self.settings.distance_scale)
                .clamp(0.0, OPEN_DISTANCE),
            None => OPEN_DISTANCE,
        }
    }
}

fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> SimSettings {
        SimSettings {
            curvature_deg_per_mm: 0.0,
            obstacle_spacing: None,
            time_scale: 0.0,
            ..SimSettings::default()
        }
    }

    #[test]
    fn test_reflectance_profile() {
        let centred = TrackWorld::new(calm());
        assert_eq!(centred.reflectance(), 4.0);

        let off = TrackWorld::new(calm()).with_pose(60.0, 0.0);
        assert_eq!(off.reflectance(), 40.0);

        let edge = TrackWorld::new(calm()).with_pose(10.0, 0.0);
        let r = edge.reflectance();
        assert!(r > 8.0 && r < 25.0, "edge reflectance {r}");
    }

    #[test]
    fn test_straight_drive_keeps_offset() {
        let mut world = TrackWorld::new(calm()).with_pose(5.0, 0.0);
        world.command(100.0, 0.0);
        world.integrate(Duration::from_millis(1000));
        assert!((world.offset() - 5.0).abs() < 1e-9);
        assert!((world.travel() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_turn_moves_sensor_across_edge() {
        let mut world = TrackWorld::new(calm());
        world.command(0.0, 110.0);
        world.integrate(Duration::from_millis(300));
        assert!((world.heading() - 33.0).abs() < 1e-6);
        // sensor is ~22mm right of centre: off the line
        assert_eq!(world.reflectance(), 40.0);
    }

    #[test]
    fn test_reverse_does_not_count_as_travel() {
        let mut world = TrackWorld::new(calm());
        world.command(-100.0, 0.0);
        world.integrate(Duration::from_millis(500));
        assert_eq!(world.travel(), 0.0);
    }

    #[test]
    fn test_obstacle_blocks_then_clears_after_turning_away() {
        let mut world = TrackWorld::new(SimSettings {
            obstacle_spacing: Some(200.0),
            ..calm()
        });
        assert_eq!(world.proximity(), 20.0);

        world.command(100.0, 0.0);
        world.integrate(Duration::from_millis(5000));
        assert_eq!(world.travel(), 200.0);
        assert_eq!(world.proximity(), 0.0);

        world.command(0.0, 100.0);
        world.integrate(Duration::from_millis(8000));
        assert_eq!(world.obstacles_cleared(), 1);
        assert_eq!(world.proximity(), 20.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
    }
}
