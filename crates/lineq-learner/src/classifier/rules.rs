//! Edge-crossing transition rules
//!
//! A pivot that moves the sensor from one light state to another reveals
//! which side of the line it is on. Turning right off the middle band onto
//! white only happens on the inner edge; onto black only on the outer edge.

use lineq_common::{Action, LightState};

/// (prior light state, action, new light state)
pub type Transition = (LightState, Action, LightState);

use Action::{PivotLeft, PivotRight};
use LightState::{Black, Middle, White};

/// Transitions that imply the inner edge
pub const INNER_RULES: [Transition; 4] = [
    (Middle, PivotRight, White),
    (Black, PivotRight, Middle),
    (White, PivotLeft, Middle),
    (Middle, PivotLeft, Black),
];

/// Transitions that imply the outer edge
pub const OUTER_RULES: [Transition; 4] = [
    (Middle, PivotRight, Black),
    (White, PivotRight, Middle),
    (Black, PivotLeft, Middle),
    (Middle, PivotLeft, White),
];
