use crate::is_fix_fresh;
use chrono::{TimeDelta, Utc};
use common::config::LocationOptions;
use common::position::{LocationFix, Position};
use std::time::Duration;

fn fix_with_age(age_ms: i64) -> LocationFix {
    LocationFix::new(
        Position::new(6.8206, 80.0390),
        None,
        Utc::now() - TimeDelta::milliseconds(age_ms),
    )
}

#[test]
fn zero_maximum_age_accepts_everything() {
    let options = LocationOptions::default();
    assert!(is_fix_fresh(&fix_with_age(3_600_000), &options, Utc::now()));
}

#[test]
fn drop_fix_older_than_maximum_age() {
    let options = LocationOptions {
        maximum_age: Duration::from_millis(1000),
        ..LocationOptions::default()
    };
    let now = Utc::now();
    let fresh = LocationFix::new(Position::new(0.0, 0.0), None, now - TimeDelta::milliseconds(500));
    let stale = LocationFix::new(Position::new(0.0, 0.0), None, now - TimeDelta::milliseconds(1500));

    assert!(is_fix_fresh(&fresh, &options, now));
    assert!(!is_fix_fresh(&stale, &options, now));
}

#[test]
fn fix_from_the_future_is_fresh() {
    let options = LocationOptions {
        maximum_age: Duration::from_millis(10),
        ..LocationOptions::default()
    };
    let now = Utc::now();
    let fix = LocationFix::new(Position::new(0.0, 0.0), None, now + TimeDelta::seconds(5));

    assert!(is_fix_fresh(&fix, &options, now));
}
