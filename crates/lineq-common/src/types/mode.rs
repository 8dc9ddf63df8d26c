//! TrackingMode - which edge of the line the robot is following

use serde::{Deserialize, Serialize};

/// Edge of the line currently straddled by the sensor
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingMode {
    #[default]
    InnerLine,
    OuterLine,
}

impl TrackingMode {
    /// All modes in table order
    pub const ALL: [TrackingMode; 2] = [TrackingMode::InnerLine, TrackingMode::OuterLine];

    /// Stable symbolic name used in persisted tables and logs
    pub const fn name(self) -> &'static str {
        match self {
            TrackingMode::InnerLine => "INNER_LINE",
            TrackingMode::OuterLine => "OUTER_LINE",
        }
    }

    /// Parse a stable symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inner() {
        assert_eq!(TrackingMode::default(), TrackingMode::InnerLine);
    }

    #[test]
    fn test_serde_uses_stable_names() {
        let json = serde_json::to_string(&TrackingMode::OuterLine).unwrap();
        assert_eq!(json, "\"OUTER_LINE\"");
        let mode: TrackingMode = serde_json::from_str("\"INNER_LINE\"").unwrap();
        assert_eq!(mode, TrackingMode::InnerLine);
    }
}
