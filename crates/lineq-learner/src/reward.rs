//! Reward shaping: R = f(new light state, direction of travel)

use serde::{Deserialize, Serialize};

use lineq_common::{Direction, LightState};

/// Reward values for each outcome of a maneuver
///
/// Black is treated as off-track regardless of tracking mode, even though
/// the outer-edge rules pass through black.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPolicy {
    /// Sensor ended on black
    pub off_track: f64,
    /// Forward progress on white or middle
    pub forward: f64,
    /// Backward (or turning) motion on white or middle
    pub backward: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            off_track: -10.0,
            forward: 15.0,
            backward: 5.0,
        }
    }
}

impl RewardPolicy {
    pub fn reward(&self, new_light: LightState, direction: Direction) -> f64 {
        match (new_light, direction) {
            (LightState::Black, _) => self.off_track,
            (_, Direction::Forward) => self.forward,
            (_, Direction::Backward) => self.backward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_is_penalised_in_any_direction() {
        let policy = RewardPolicy::default();
        assert_eq!(policy.reward(LightState::Black, Direction::Forward), -10.0);
        assert_eq!(policy.reward(LightState::Black, Direction::Backward), -10.0);
    }

    #[test]
    fn test_forward_beats_backward() {
        let policy = RewardPolicy::default();
        for light in [LightState::White, LightState::Middle] {
            assert_eq!(policy.reward(light, Direction::Forward), 15.0);
            assert_eq!(policy.reward(light, Direction::Backward), 5.0);
        }
    }
}
