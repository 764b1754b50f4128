use crate::{
    Cli, create_location_module, load_config, provider_unsupported_view,
    read_waypoints_from_file,
};
use clap::Parser;
use common::config::{ConfigError, LocationOptions, ProximityConfig};
use common::position::Position;
use module_core::EventBus;
use std::path::PathBuf;

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../assets")
        .join(name)
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("proximity_headless").chain(args.iter().copied()))
        .unwrap_or_else(|e| panic!("Failed to parse arguments {args:?}. Error: {e}"))
}

#[test]
fn parse_negative_target_coordinates() {
    let cli = parse(&[
        "--target-lat",
        "-33.8568",
        "--target-lon",
        "-70.6483",
        "--radius",
        "10",
    ]);

    assert_eq!(cli.target_lat, Some(-33.8568));
    assert_eq!(cli.target_lon, Some(-70.6483));
    assert_eq!(cli.radius, Some(10.0));
}

#[test]
fn gpsd_uses_default_address() {
    let cli = parse(&["--gpsd"]);
    assert_eq!(cli.gpsd.as_deref(), Some("127.0.0.1:2947"));

    let cli = parse(&["--gpsd", "10.0.0.2:2947"]);
    assert_eq!(cli.gpsd.as_deref(), Some("10.0.0.2:2947"));
}

#[test]
fn override_config_file_target() {
    let config_file = asset("config.json");
    let cli = parse(&[
        "--config",
        config_file.to_str().unwrap(),
        "--target-lat",
        "-33.8568",
        "--radius",
        "25",
    ]);
    let config = load_config(&cli).unwrap();

    assert_eq!(config.target.latitude, -33.8568);
    assert_eq!(config.target.longitude, 80.0390);
    assert_eq!(config.target.trigger_radius, 25.0);
    assert_eq!(config.location, LocationOptions::default());
}

#[test]
fn reject_invalid_radius_override() {
    let config_file = asset("config.json");
    let cli = parse(&[
        "--config",
        config_file.to_str().unwrap(),
        "--radius",
        "-1",
    ]);
    let config = load_config(&cli).unwrap();

    assert!(matches!(
        config.target(),
        Err(ConfigError::InvalidRadius(_))
    ));
}

#[test_log::test]
fn report_missing_config_file() {
    let cli = parse(&["--config", "/does/not/exist.json"]);

    assert!(load_config(&cli).is_err());
}

#[test_log::test]
fn read_demo_waypoints() {
    let positions = read_waypoints_from_file(&asset("walk.csv")).unwrap();

    assert_eq!(positions.len(), 4);
    assert_eq!(positions[0], Position::new(6.8170, 80.0390));
    assert_eq!(positions[3], Position::new(6.8206, 80.0390));
}

#[tokio::test]
#[test_log::test]
async fn without_location_source_report_unsupported() {
    let cli = parse(&[]);
    let event_bus = EventBus::default();

    let location = create_location_module(&event_bus, &cli, &ProximityConfig::default())
        .await
        .unwrap();
    assert!(location.is_none());
    assert_eq!(
        provider_unsupported_view().to_string(),
        "lat: -- | lon: -- | distance: --m | Geolocation not supported | AR disabled"
    );
}

#[tokio::test]
#[test_log::test]
async fn create_replay_source() {
    let replay_file = asset("replay.jsonl");
    let cli = parse(&["--replay", replay_file.to_str().unwrap()]);
    let event_bus = EventBus::default();

    let location = create_location_module(&event_bus, &cli, &ProximityConfig::default())
        .await
        .unwrap();
    assert!(location.is_some());
}
