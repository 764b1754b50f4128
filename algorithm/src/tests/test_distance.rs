use crate::{EARTH_RADIUS_M, calculate_distance};
use common::position::Position;

fn sample_positions() -> Vec<Position> {
    vec![
        Position::new(6.8206, 80.0390),
        Position::new(0.0, 0.0),
        Position::new(52.026649, 11.282535),
        Position::new(-33.8688, 151.2093),
        Position::new(89.9, -179.9),
        Position::new(-90.0, 180.0),
    ]
}

#[test]
fn distance_to_itself_is_zero() {
    for pos in sample_positions() {
        assert_eq!(calculate_distance(&pos, &pos), 0.0, "position {pos:?}");
    }
}

#[test]
fn distance_to_target_at_target_is_zero() {
    let pos = Position::new(6.8206, 80.0390);
    assert_eq!(calculate_distance(&pos, &pos), 0.0);
}

#[test]
fn distance_is_symmetric() {
    let positions = sample_positions();
    for a in &positions {
        for b in &positions {
            assert_eq!(calculate_distance(a, b), calculate_distance(b, a));
        }
    }
}

#[test]
fn one_degree_of_longitude_at_the_equator() {
    let distance = calculate_distance(&Position::new(0.0, 0.0), &Position::new(0.0, 1.0));
    assert!((distance - 111_195.0).abs() <= 1.0, "distance {distance}");
}

#[test]
fn antipodal_points_are_half_the_circumference_apart() {
    let distance = calculate_distance(&Position::new(0.0, 0.0), &Position::new(0.0, 180.0));
    let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
    assert!((distance - half_circumference).abs() < 1e-3, "distance {distance}");
}

#[test]
fn distance_is_never_negative() {
    let positions = sample_positions();
    for a in &positions {
        for b in &positions {
            assert!(calculate_distance(a, b) >= 0.0);
        }
    }
}

#[test]
fn nan_propagates() {
    let distance = calculate_distance(&Position::new(f64::NAN, 0.0), &Position::new(0.0, 1.0));
    assert!(distance.is_nan());
}
