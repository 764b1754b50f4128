use crate::{fixed::to_fixed, location_error::LocationError, position::Position};
use serde::{Deserialize, Serialize};

/// The status derived from the latest location update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ProximityState {
    /// No location update was received yet.
    #[default]
    Unknown,

    /// The distance to the target is less than or equal to the trigger radius.
    InRange,

    /// The target is further away than the trigger radius.
    /// Contains the meters that are still missing.
    OutOfRange { remaining: f64 },

    /// The location provider reported a failure.
    Error(LocationError),
}

impl ProximityState {
    /// Returns the human-readable status message for the state.
    ///
    /// The remaining distance is shown with one decimal, see [`to_fixed`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::proximity::ProximityState;
    ///
    /// let state = ProximityState::OutOfRange { remaining: 12.34 };
    /// assert_eq!(state.message(), "Get closer, 12.3m more");
    /// ```
    pub fn message(&self) -> String {
        match self {
            ProximityState::Unknown => "Requesting location...".to_string(),
            ProximityState::InRange => "Within range! AR ready to view".to_string(),
            ProximityState::OutOfRange { remaining } => {
                format!("Get closer, {}m more", to_fixed(*remaining, 1))
            }
            ProximityState::Error(e) => e.to_string(),
        }
    }

    /// The action control (AR entry) is only enabled while in range.
    pub fn is_action_enabled(&self) -> bool {
        matches!(self, ProximityState::InRange)
    }
}

/// Everything the render layer needs for one update.
///
/// `position` and `distance` hold the latest successful reading, they are kept
/// when a later update fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityReport {
    pub position: Option<Position>,
    pub distance: Option<f64>,
    pub state: ProximityState,
}
