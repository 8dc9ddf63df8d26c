//! ValueTable - learned desirability of each maneuver per state
//!
//! The key space is closed: 2 modes × 3 light states × 4 actions. Entries are
//! stored densely so every key always has a value and none can be removed.

use lineq_common::{Action, LightState, StorageError, TrackingMode, TABLE_SIZE};

use super::store::TableRecord;

type Row = [f64; 4];

/// Q-value table over (mode, light state, action)
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: [[Row; 3]; 2],
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTable {
    /// All-zero table
    pub fn new() -> Self {
        Self {
            values: [[[0.0; 4]; 3]; 2],
        }
    }

    #[inline]
    pub fn get(&self, mode: TrackingMode, light: LightState, action: Action) -> f64 {
        self.values[mode.index()][light.index()][action.index()]
    }

    #[inline]
    pub fn set(&mut self, mode: TrackingMode, light: LightState, action: Action, value: f64) {
        self.values[mode.index()][light.index()][action.index()] = value;
    }

    /// Highest-valued action for a state
    ///
    /// Scans in [`Action::ALL`] order and only replaces the incumbent on a
    /// strictly greater value, so ties go to the earliest action.
    pub fn best_action(&self, mode: TrackingMode, light: LightState) -> (Action, f64) {
        let row = &self.values[mode.index()][light.index()];
        let mut best = (Action::ALL[0], row[0]);
        for action in &Action::ALL[1..] {
            let q = row[action.index()];
            if q > best.1 {
                best = (*action, q);
            }
        }
        best
    }

    /// One-step temporal-difference update; returns the new value
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        mode: TrackingMode,
        light: LightState,
        action: Action,
        reward: f64,
        next_mode: TrackingMode,
        next_light: LightState,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let (_, max_next) = self.best_action(next_mode, next_light);
        let current = self.get(mode, light, action);
        let updated = current + learning_rate * (reward + discount_factor * max_next - current);
        self.set(mode, light, action, updated);
        updated
    }

    /// Iterate all entries in (mode, light, action) order
    pub fn entries(&self) -> impl Iterator<Item = (TrackingMode, LightState, Action, f64)> + '_ {
        TrackingMode::ALL.into_iter().flat_map(move |mode| {
            LightState::ALL.into_iter().flat_map(move |light| {
                Action::ALL
                    .into_iter()
                    .map(move |action| (mode, light, action, self.get(mode, light, action)))
            })
        })
    }

    /// Flatten to persistence records keyed by stable names
    pub fn to_records(&self) -> Vec<TableRecord> {
        self.entries()
            .map(|(mode, light, action, value)| TableRecord {
                mode: mode.name().to_string(),
                light_state: light.name().to_string(),
                action: action.name().to_string(),
                value,
            })
            .collect()
    }

    /// Rebuild from persistence records
    ///
    /// Every key must appear exactly once. Unknown names, duplicates and
    /// missing keys are all load errors; nothing is defaulted.
    pub fn from_records(records: &[TableRecord]) -> Result<Self, StorageError> {
        let mut table = Self::new();
        let mut seen = [[[false; 4]; 3]; 2];

        for record in records {
            let mode = TrackingMode::from_name(&record.mode).ok_or_else(|| {
                StorageError::UnknownName {
                    field: "mode",
                    value: record.mode.clone(),
                }
            })?;
            let light = LightState::from_name(&record.light_state).ok_or_else(|| {
                StorageError::UnknownName {
                    field: "light_state",
                    value: record.light_state.clone(),
                }
            })?;
            let action: Action = record.action.parse()?;

            let slot = &mut seen[mode.index()][light.index()][action.index()];
            if *slot {
                return Err(StorageError::Malformed(format!(
                    "duplicate entry ({mode}, {light}, {action})"
                )));
            }
            *slot = true;

            if !record.value.is_finite() {
                return Err(StorageError::Malformed(format!(
                    "non-finite value for ({mode}, {light}, {action})"
                )));
            }
            table.set(mode, light, action, record.value);
        }

        if records.len() != TABLE_SIZE {
            let missing = table
                .entries()
                .find(|(m, l, a, _)| !seen[m.index()][l.index()][a.index()])
                .map(|(m, l, a, _)| format!("({m}, {l}, {a})"))
                .unwrap_or_default();
            return Err(StorageError::Malformed(format!(
                "expected {TABLE_SIZE} entries, found {}; missing {missing}",
                records.len()
            )));
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHA: f64 = 0.1;
    const GAMMA: f64 = 0.9;

    #[test]
    fn test_zero_table_prefers_advance() {
        let table = ValueTable::new();
        for mode in TrackingMode::ALL {
            for light in LightState::ALL {
                assert_eq!(table.best_action(mode, light), (Action::Advance, 0.0));
            }
        }
    }

    #[test]
    fn test_best_action_tie_goes_to_first() {
        let mut table = ValueTable::new();
        let (mode, light) = (TrackingMode::OuterLine, LightState::Middle);
        table.set(mode, light, Action::PivotLeft, 3.0);
        table.set(mode, light, Action::PivotRight, 3.0);
        assert_eq!(table.best_action(mode, light), (Action::PivotLeft, 3.0));
    }

    #[test]
    fn test_best_action_all_negative() {
        let mut table = ValueTable::new();
        let (mode, light) = (TrackingMode::InnerLine, LightState::Black);
        for (i, action) in Action::ALL.into_iter().enumerate() {
            table.set(mode, light, action, -10.0 + i as f64);
        }
        assert_eq!(table.best_action(mode, light), (Action::PivotRight, -7.0));
    }

    #[test]
    fn test_positive_reward_increases_value() {
        let mut table = ValueTable::new();
        let value = table.update(
            TrackingMode::InnerLine,
            LightState::White,
            Action::Advance,
            15.0,
            TrackingMode::InnerLine,
            LightState::Middle,
            ALPHA,
            GAMMA,
        );
        assert!(value > 0.0);
        assert!((value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_update_uses_lookahead() {
        let mut table = ValueTable::new();
        table.set(TrackingMode::OuterLine, LightState::Middle, Action::Reverse, 10.0);

        let value = table.update(
            TrackingMode::InnerLine,
            LightState::White,
            Action::PivotLeft,
            5.0,
            TrackingMode::OuterLine,
            LightState::Middle,
            ALPHA,
            GAMMA,
        );
        // 0 + 0.1 * (5 + 0.9 * 10 - 0)
        assert!((value - 1.4).abs() < 1e-12);
        assert_eq!(
            table.get(TrackingMode::InnerLine, LightState::White, Action::PivotLeft),
            value
        );
    }

    #[test]
    fn test_entries_cover_key_space() {
        let table = ValueTable::new();
        assert_eq!(table.entries().count(), TABLE_SIZE);
        assert_eq!(table.to_records().len(), TABLE_SIZE);
    }

    #[test]
    fn test_records_round_trip_after_partial_updates() {
        let mut table = ValueTable::new();
        table.set(TrackingMode::InnerLine, LightState::Black, Action::PivotRight, 0.5);
        table.set(TrackingMode::OuterLine, LightState::White, Action::Reverse, -3.25);
        table.update(
            TrackingMode::OuterLine,
            LightState::Middle,
            Action::Advance,
            15.0,
            TrackingMode::InnerLine,
            LightState::Black,
            ALPHA,
            GAMMA,
        );

        let restored = ValueTable::from_records(&table.to_records()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut records = ValueTable::new().to_records();
        records[5].action = "moonwalk".to_string();
        let err = ValueTable::from_records(&records).unwrap_err();
        assert!(matches!(err, StorageError::UnknownAction(name) if name == "moonwalk"));
    }

    #[test]
    fn test_missing_entry_rejected() {
        let mut records = ValueTable::new().to_records();
        records.pop();
        let err = ValueTable::from_records(&records).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
        assert!(err.to_string().contains("turn_right"));
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut records = ValueTable::new().to_records();
        records[1] = records[0].clone();
        assert!(matches!(
            ValueTable::from_records(&records),
            Err(StorageError::Malformed(_))
        ));
    }
}
