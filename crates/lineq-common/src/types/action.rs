//! Action - the closed set of maneuvers the learner can choose from
//!
//! Each action has a stable symbolic name. The name is the only identity that
//! crosses the persistence boundary; the enum discriminant never does.

use std::str::FromStr;

use crate::error::StorageError;

/// One of the four fixed maneuvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Drive straight ahead for a fixed time budget
    Advance,
    /// Drive straight back for a fixed time budget
    Reverse,
    /// Turn left until the light state changes
    PivotLeft,
    /// Turn right until the light state changes
    PivotRight,
}

/// Stable name table. Order is the tie-break order for greedy selection.
const NAMES: [(Action, &str); 4] = [
    (Action::Advance, "forward"),
    (Action::Reverse, "backward"),
    (Action::PivotLeft, "turn_left"),
    (Action::PivotRight, "turn_right"),
];

impl Action {
    /// All actions in enumeration (and tie-break) order
    pub const ALL: [Action; 4] = [
        Action::Advance,
        Action::Reverse,
        Action::PivotLeft,
        Action::PivotRight,
    ];

    /// Stable symbolic name
    pub fn name(self) -> &'static str {
        NAMES[self.index()].1
    }

    /// Parse a stable symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES.iter().find(|(_, n)| *n == name).map(|(a, _)| *a)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction of travel credited to this action when shaping reward
    ///
    /// Only [`Action::Advance`] counts as forward; pivots are grouped with
    /// reversing.
    pub fn direction(self) -> Direction {
        match self {
            Action::Advance => Direction::Forward,
            Action::Reverse | Action::PivotLeft | Action::PivotRight => Direction::Backward,
        }
    }

    /// Whether the action exits on a light-state change rather than a timer
    pub fn is_pivot(self) -> bool {
        matches!(self, Action::PivotLeft | Action::PivotRight)
    }
}

impl FromStr for Action {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::from_name(s).ok_or_else(|| StorageError::UnknownAction(s.to_string()))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of travel derived from an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_table_matches_enum_order() {
        for (i, (action, _)) in NAMES.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::ALL[i], *action);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("turn_right".parse::<Action>().unwrap(), Action::PivotRight);
        assert_eq!("forward".parse::<Action>().unwrap(), Action::Advance);

        let err = "jump".parse::<Action>().unwrap_err();
        assert!(matches!(err, StorageError::UnknownAction(name) if name == "jump"));
    }

    #[test]
    fn test_direction() {
        assert_eq!(Action::Advance.direction(), Direction::Forward);
        assert_eq!(Action::Reverse.direction(), Direction::Backward);
        assert_eq!(Action::PivotLeft.direction(), Direction::Backward);
        assert_eq!(Action::PivotRight.direction(), Direction::Backward);
    }

    #[test]
    fn test_pivots() {
        assert!(Action::PivotLeft.is_pivot());
        assert!(!Action::Reverse.is_pivot());
    }
}
