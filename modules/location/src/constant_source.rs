use crate::{LocationSourceError, publish_update, run_until_quit};
use chrono::Utc;
use common::position::{LocationFix, LocationUpdate, Position};
use module_core::{Event, Module, ModuleCtx};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error};
use utm::{lat_lon_to_zone_number, lat_to_zone_letter, to_utm_wgs84, wsg84_utm_to_lat_lon};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct UtmPoint {
    northing: f64,
    easting: f64,
}

/// A location source that walks along waypoints with a constant velocity
struct ConstantLocationSourceRuntime {
    points: Vec<UtmPoint>,
    next_point: usize,
    current_point: UtmPoint,
    step_length: f64,
    zone: u8,
    zone_letter: char,
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl ConstantLocationSourceRuntime {
    fn new(
        config: &ConstantLocationModuleConfig,
        sender: tokio::sync::broadcast::Sender<Event>,
    ) -> Self {
        ConstantLocationSourceRuntime {
            points: config.points.clone(),
            next_point: 1,
            current_point: config.points[0],
            step_length: config.velocity * config.interval.as_secs_f64(),
            zone: config.zone,
            zone_letter: config.zone_letter,
            sender,
        }
    }

    fn handle_tick(&mut self) {
        let Ok((latitude, longitude)) = wsg84_utm_to_lat_lon(
            self.current_point.easting,
            self.current_point.northing,
            self.zone,
            self.zone_letter,
        ) else {
            error!("Failed to convert UTM point {:?}", self.current_point);
            return;
        };
        debug!("Walking at lat: {latitude}, long: {longitude}");
        publish_update(
            &self.sender,
            LocationUpdate::Fix(LocationFix::new(
                Position::new(latitude, longitude),
                None,
                Utc::now(),
            )),
        );
        self.advance();
    }

    /// Moves the current point one step towards the next waypoints.
    ///
    /// A step may pass several waypoints. The walk ends on the last waypoint.
    fn advance(&mut self) {
        let mut remaining = self.step_length;
        while remaining > 0.0 && self.next_point < self.points.len() {
            let waypoint = self.points[self.next_point];
            let delta_easting = waypoint.easting - self.current_point.easting;
            let delta_northing = waypoint.northing - self.current_point.northing;
            let length = delta_easting.hypot(delta_northing);
            if length <= remaining {
                self.current_point = waypoint;
                self.next_point += 1;
                remaining -= length;
            } else {
                self.current_point.easting += delta_easting / length * remaining;
                self.current_point.northing += delta_northing / length * remaining;
                remaining = 0.0;
            }
        }
    }
}

fn convert_waypoints(
    positions: &[Position],
) -> Result<(Vec<UtmPoint>, u8, char), LocationSourceError> {
    let first = positions.first().ok_or(LocationSourceError::EmptyWaypoints)?;
    let zone = lat_lon_to_zone_number(first.latitude, first.longitude);
    let zone_letter = lat_to_zone_letter(first.latitude).ok_or(
        LocationSourceError::InvalidWaypoint {
            latitude: first.latitude,
            longitude: first.longitude,
        },
    )?;
    let mut points = Vec::<UtmPoint>::with_capacity(positions.len());
    for pos in positions.iter() {
        if !pos.is_valid() {
            return Err(LocationSourceError::InvalidWaypoint {
                latitude: pos.latitude,
                longitude: pos.longitude,
            });
        }
        // Every waypoint is projected into the zone of the first one.
        let (northing, easting, _) = to_utm_wgs84(pos.latitude, pos.longitude, zone);
        points.push(UtmPoint { northing, easting });
    }
    Ok((points, zone, zone_letter))
}

#[derive(Clone)]
struct ConstantLocationModuleConfig {
    points: Vec<UtmPoint>,
    zone: u8,
    zone_letter: char,
    velocity: f64,
    interval: Duration,
}

/// Simulated location provider that walks along a list of waypoints.
///
/// Every `interval` the current position is published and then moved
/// `velocity * interval` meters towards the next waypoint. After the last
/// waypoint is reached that position is reported until the module stops.
pub struct ConstantLocationModule {
    ctx: ModuleCtx,
    config: Arc<ConstantLocationModuleConfig>,
}

impl ConstantLocationModule {
    /// Creates the module.
    ///
    /// # Arguments
    ///
    /// * `ctx` – The context of the event bus the fixes are published on.
    /// * `positions` – The waypoints, the walk starts on the first one.
    /// * `velocity` – Walking speed in meters per second.
    /// * `interval` – Time between two published fixes.
    ///
    /// # Errors
    ///
    /// Fails if `positions` is empty or contains a position that has no UTM zone.
    pub fn new(
        ctx: ModuleCtx,
        positions: &[Position],
        velocity: f64,
        interval: Duration,
    ) -> Result<Self, LocationSourceError> {
        let (points, zone, zone_letter) = convert_waypoints(positions)?;
        Ok(ConstantLocationModule {
            ctx,
            config: Arc::new(ConstantLocationModuleConfig {
                points,
                zone,
                zone_letter,
                velocity,
                interval,
            }),
        })
    }
}

#[async_trait::async_trait]
impl Module for ConstantLocationModule {
    async fn run(&mut self) -> Result<(), ()> {
        let config = self.config.clone();
        let sender = self.ctx.sender.clone();
        let walk_task_handle = tokio::spawn(async move {
            constant_location_task(sender, config).await;
        });
        run_until_quit(&mut self.ctx, &walk_task_handle, "ConstantLocationModule").await
    }
}

async fn constant_location_task(
    sender: tokio::sync::broadcast::Sender<Event>,
    config: Arc<ConstantLocationModuleConfig>,
) {
    // A zero period makes tokio panic.
    let mut timer = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
    let mut runtime = ConstantLocationSourceRuntime::new(&config, sender);
    loop {
        timer.tick().await;
        runtime.handle_tick();
    }
}
