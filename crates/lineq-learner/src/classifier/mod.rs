//! Tracking-mode classifier
pub mod rules;

use lineq_common::{Action, LightState, TrackingMode};

use self::rules::{INNER_RULES, OUTER_RULES};

/// Infer which edge the robot is tracking from an observed transition
///
/// Inner rules are checked first, then outer; a transition matching neither
/// leaves `current` unchanged.
pub fn infer_mode(
    prior: LightState,
    new: LightState,
    action: Action,
    current: TrackingMode,
) -> TrackingMode {
    let transition = (prior, action, new);
    if INNER_RULES.contains(&transition) {
        TrackingMode::InnerLine
    } else if OUTER_RULES.contains(&transition) {
        TrackingMode::OuterLine
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_right_white_is_inner() {
        for current in TrackingMode::ALL {
            assert_eq!(
                infer_mode(LightState::Middle, LightState::White, Action::PivotRight, current),
                TrackingMode::InnerLine
            );
        }
    }

    #[test]
    fn test_middle_right_black_is_outer() {
        assert_eq!(
            infer_mode(
                LightState::Middle,
                LightState::Black,
                Action::PivotRight,
                TrackingMode::InnerLine
            ),
            TrackingMode::OuterLine
        );
    }

    #[test]
    fn test_unmatched_keeps_mode() {
        for current in TrackingMode::ALL {
            assert_eq!(
                infer_mode(LightState::White, LightState::Black, Action::Advance, current),
                current
            );
            assert_eq!(
                infer_mode(LightState::Middle, LightState::Middle, Action::PivotLeft, current),
                current
            );
        }
    }

    #[test]
    fn test_rule_sets_are_disjoint() {
        for rule in INNER_RULES {
            assert!(!OUTER_RULES.contains(&rule), "{rule:?} in both rule sets");
        }
    }

    #[test]
    fn test_rules_only_involve_pivots_with_a_state_change() {
        for (prior, action, new) in INNER_RULES.into_iter().chain(OUTER_RULES) {
            assert!(action.is_pivot());
            assert_ne!(prior, new);
        }
    }
}
