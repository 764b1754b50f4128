// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::calculate_distance;
use common::position::{LocationUpdate, Position};
use location::{LocationSourceError, constant_source::ConstantLocationModule};
use module_core::{
    EventBus, EventKind, EventKindType, Module, ModuleCtx, payload_ref,
    test_helper::{collect_events, stop_module, wait_for_event},
};
use std::time::Duration;

const TIMEOUT_MS: u64 = 100;
const VELOCITY: f64 = 10.0;
const INTERVAL_MS: u64 = 10;

fn waypoints() -> Vec<Position> {
    vec![
        Position::new(6.8226, 80.0390),
        Position::new(6.8216, 80.0390),
        Position::new(6.8206, 80.0390),
    ]
}

fn start_module(
    ctx: ModuleCtx,
    positions: Vec<Position>,
    velocity: f64,
) -> tokio::task::JoinHandle<Result<(), ()>> {
    tokio::spawn(async move {
        let mut constant_source = ConstantLocationModule::new(
            ctx,
            &positions,
            velocity,
            Duration::from_millis(INTERVAL_MS),
        )
        .unwrap();
        constant_source.run().await
    })
}

fn fix_position(update: &LocationUpdate) -> Position {
    match update {
        LocationUpdate::Fix(fix) => fix.to_position(),
        LocationUpdate::Error(e) => panic!("Expected a fix, got error {e}"),
    }
}

#[test]
fn report_creation_error_with_empty_positions() {
    let event_bus = EventBus::default();
    let constant_source = ConstantLocationModule::new(
        event_bus.context(),
        &[],
        VELOCITY,
        Duration::from_millis(INTERVAL_MS),
    );
    assert!(matches!(
        constant_source,
        Err(LocationSourceError::EmptyWaypoints)
    ));
}

#[test]
fn report_creation_error_with_invalid_position() {
    let event_bus = EventBus::default();
    let constant_source = ConstantLocationModule::new(
        event_bus.context(),
        &[Position::new(6.8206, 80.0390), Position::new(6.8206, 200.0)],
        VELOCITY,
        Duration::from_millis(INTERVAL_MS),
    );
    assert!(matches!(
        constant_source,
        Err(LocationSourceError::InvalidWaypoint { .. })
    ));
}

#[tokio::test]
#[test_log::test]
async fn start_on_first_waypoint() {
    let event_bus = EventBus::default();
    let mut rx = event_bus.subscribe();
    let mut module_handle = start_module(event_bus.context(), waypoints(), VELOCITY);

    let event = wait_for_event(
        &mut rx,
        Duration::from_millis(TIMEOUT_MS),
        EventKindType::LocationUpdateEvent,
    )
    .await;
    let position = fix_position(payload_ref!(event.kind, EventKind::LocationUpdateEvent).unwrap());

    assert!(calculate_distance(&position, &waypoints()[0]) < 0.5);

    stop_module(&event_bus, &mut module_handle).await;
}

#[tokio::test]
#[test_log::test]
async fn walk_towards_the_last_waypoint() {
    let event_bus = EventBus::default();
    let mut rx = event_bus.subscribe();
    let mut module_handle = start_module(event_bus.context(), waypoints(), VELOCITY);

    let events = collect_events(
        &mut rx,
        Duration::from_millis(TIMEOUT_MS),
        EventKindType::LocationUpdateEvent,
    )
    .await;
    assert!(events.len() >= 2, "received {} fixes", events.len());

    let last = waypoints()[2];
    let distances: Vec<f64> = events
        .iter()
        .map(|event| {
            let update = payload_ref!(event.kind, EventKind::LocationUpdateEvent).unwrap();
            calculate_distance(&fix_position(update), &last)
        })
        .collect();
    for pair in distances.windows(2) {
        assert!(pair[1] < pair[0], "distances {distances:?}");
    }
    // Each tick moves velocity * interval meters.
    let step = distances[0] - distances[1];
    assert!((step - VELOCITY * INTERVAL_MS as f64 / 1000.0).abs() < 0.01, "step {step}");

    stop_module(&event_bus, &mut module_handle).await;
}

#[tokio::test]
#[test_log::test]
async fn stay_on_the_last_waypoint() {
    let event_bus = EventBus::default();
    let mut rx = event_bus.subscribe();
    // Fast enough to pass every waypoint within the first step.
    let mut module_handle = start_module(event_bus.context(), waypoints(), 100_000.0);

    let events = collect_events(
        &mut rx,
        Duration::from_millis(TIMEOUT_MS),
        EventKindType::LocationUpdateEvent,
    )
    .await;
    assert!(events.len() >= 3, "received {} fixes", events.len());

    let last = waypoints()[2];
    for event in events.iter().skip(1) {
        let update = payload_ref!(event.kind, EventKind::LocationUpdateEvent).unwrap();
        assert!(calculate_distance(&fix_position(update), &last) < 0.5);
    }

    stop_module(&event_bus, &mut module_handle).await;
}
