//! Exploration decay: p(i) = base^(-i / temperature)

use serde::{Deserialize, Serialize};

/// Probability of picking a random maneuver at a given iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    base: f64,
    temperature: f64,
    stop_threshold: f64,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::new(
            crate::DEFAULT_DECAY_BASE,
            crate::DEFAULT_DECAY_TEMPERATURE,
            crate::DEFAULT_STOP_THRESHOLD,
        )
    }
}

impl ExplorationSchedule {
    /// `base > 1` and `temperature > 0` are checked by [`crate::LearnerConfig::validate`]
    pub fn new(base: f64, temperature: f64, stop_threshold: f64) -> Self {
        Self {
            base,
            temperature,
            stop_threshold,
        }
    }

    #[inline]
    pub fn probability(&self, iteration: u64) -> f64 {
        self.base.powf(-(iteration as f64) / self.temperature)
    }

    pub fn stop_threshold(&self) -> f64 {
        self.stop_threshold
    }

    /// Whether learning is over at this iteration
    #[inline]
    pub fn exhausted(&self, iteration: u64) -> bool {
        self.probability(iteration) < self.stop_threshold
    }

    /// First iteration at which the schedule is exhausted
    pub fn stop_iteration(&self) -> u64 {
        // Closed form, then nudged to absorb floating-point error.
        let estimate = self.temperature * (1.0 / self.stop_threshold).ln() / self.base.ln();
        let mut i = estimate.floor().max(0.0) as u64;
        while i > 0 && self.exhausted(i - 1) {
            i -= 1;
        }
        while !self.exhausted(i) {
            i += 1;
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_fully_exploring() {
        let schedule = ExplorationSchedule::default();
        assert!((schedule.probability(0) - 1.0).abs() < 1e-12);
        assert!(!schedule.exhausted(0));
    }

    #[test]
    fn test_strictly_decreasing() {
        let schedule = ExplorationSchedule::default();
        let mut prev = schedule.probability(0);
        for i in 1..5_000 {
            let p = schedule.probability(i);
            assert!(p < prev, "p({i}) = {p} not below {prev}");
            assert!(p > 0.0);
            prev = p;
        }
    }

    #[test]
    fn test_stop_iteration_is_first_exhausted() {
        let schedule = ExplorationSchedule::default();
        let stop = schedule.stop_iteration();
        assert!(schedule.exhausted(stop));
        assert!(!schedule.exhausted(stop - 1));
        // ln(100) / ln(2.7321) * 1000 ≈ 4582
        assert!((4_500..4_700).contains(&stop));
    }

    #[test]
    fn test_fast_schedule() {
        let schedule = ExplorationSchedule::new(2.0, 1.0, 0.2);
        // 2^-2 = 0.25, 2^-3 = 0.125
        assert_eq!(schedule.stop_iteration(), 3);
    }
}
