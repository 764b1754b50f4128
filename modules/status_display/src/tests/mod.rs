use crate::StatusView;
use common::location_error::LocationError;
use common::position::Position;
use common::proximity::{ProximityReport, ProximityState};

fn reading(state: ProximityState) -> ProximityReport {
    ProximityReport {
        position: Some(Position::new(6.82064321, 80.03901234)),
        distance: Some(123.456),
        state,
    }
}

#[test]
fn render_out_of_range() {
    let view = StatusView::from_report(&reading(ProximityState::OutOfRange {
        remaining: 73.456,
    }));

    assert_eq!(
        view,
        StatusView {
            latitude: "6.8206".to_string(),
            longitude: "80.0390".to_string(),
            distance: "123.5".to_string(),
            status: "Get closer, 73.5m more".to_string(),
            action_enabled: false,
        }
    );
}

#[test]
fn render_in_range() {
    let view = StatusView::from_report(&reading(ProximityState::InRange));

    assert!(view.action_enabled);
    assert_eq!(
        view.to_string(),
        "lat: 6.8206 | lon: 80.0390 | distance: 123.5m | Within range! AR ready to view | AR enabled"
    );
}

#[test]
fn render_error_keeps_reading() {
    let view = StatusView::from_report(&reading(ProximityState::Error(
        LocationError::PositionUnavailable,
    )));

    assert_eq!(view.latitude, "6.8206");
    assert_eq!(view.status, "Location unavailable");
    assert!(!view.action_enabled);
}

#[test]
fn render_without_reading() {
    let view = StatusView::from_report(&ProximityReport {
        position: None,
        distance: None,
        state: ProximityState::Error(LocationError::ProviderUnsupported),
    });

    assert_eq!(view.latitude, "--");
    assert_eq!(view.longitude, "--");
    assert_eq!(view.distance, "--");
    assert_eq!(view.status, "Geolocation not supported");
}

#[test]
fn round_exact_halves_up() {
    let view = StatusView::from_report(&ProximityReport {
        position: Some(Position::new(0.03125, -0.03125)),
        distance: Some(50.25),
        state: ProximityState::OutOfRange { remaining: 0.25 },
    });

    assert_eq!(view.latitude, "0.0313");
    assert_eq!(view.longitude, "-0.0313");
    assert_eq!(view.distance, "50.3");
    assert_eq!(view.status, "Get closer, 0.3m more");
}
