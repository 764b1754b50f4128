// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{LocationUpdate, Position};
use common::proximity::{ProximityReport, ProximityState};
use common::target::Target;
use std::f64::consts::PI;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6371e3;

/// Calculates the great-circle distance in meters between two geographic positions.
///
/// The calculation uses the haversine formula on a sphere with the radius
/// [`EARTH_RADIUS_M`]. The half-angle terms are written as products of sines
/// and the angular distance is taken with `atan2`, so the result matches the
/// usual reference implementation bit for bit.
///
/// # Parameters
/// - `pos1`: Reference to the first geographic position.
/// - `pos2`: Reference to the second geographic position.
///
/// # Returns
/// The distance between `pos1` and `pos2` in meters as a `f64`.
///
/// # Notes
/// - The function expects latitude and longitude values in **degrees**.
/// - Inputs are not validated. A NaN component yields a NaN distance.
///
/// # Example
///
/// ```rust
/// use algorithm::calculate_distance;
/// use common::position::Position;
///
/// let distance = calculate_distance(&Position::new(0.0, 0.0), &Position::new(0.0, 1.0));
/// assert!((distance - 111_195.0).abs() < 1.0);
/// ```
pub fn calculate_distance(pos1: &Position, pos2: &Position) -> f64 {
    let phi1 = degrees_to_radians(pos1.latitude);
    let phi2 = degrees_to_radians(pos2.latitude);
    let delta_phi = degrees_to_radians(pos2.latitude - pos1.latitude);
    let delta_lambda = degrees_to_radians(pos2.longitude - pos1.longitude);

    let a = (delta_phi / 2.0).sin() * (delta_phi / 2.0).sin()
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin() * (delta_lambda / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

// Multiplies before dividing, `f64::to_radians` rounds differently in the last bit.
fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Derives the proximity state from a distance and the trigger radius.
///
/// The boundary is inclusive: a distance equal to the radius is in range.
/// Otherwise the state carries the meters that are still missing. A NaN
/// distance is never in range and produces a NaN remainder.
pub fn proximity_state(distance: f64, trigger_radius: f64) -> ProximityState {
    if distance <= trigger_radius {
        ProximityState::InRange
    } else {
        ProximityState::OutOfRange {
            remaining: distance - trigger_radius,
        }
    }
}

/// Applies one location update to the previous report.
///
/// A fix replaces the latest reading and derives a fresh state against the
/// `target`. A provider error keeps the latest reading of `previous` and
/// only switches the state to [`ProximityState::Error`].
pub fn reduce_location_update(
    previous: &ProximityReport,
    update: &LocationUpdate,
    target: &Target,
) -> ProximityReport {
    match update {
        LocationUpdate::Fix(fix) => {
            let position = fix.to_position();
            let distance = calculate_distance(&position, target.position());
            ProximityReport {
                position: Some(position),
                distance: Some(distance),
                state: proximity_state(distance, target.trigger_radius()),
            }
        }
        LocationUpdate::Error(e) => ProximityReport {
            state: ProximityState::Error(*e),
            ..*previous
        },
    }
}

#[cfg(test)]
mod tests;
