// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::reduce_location_update;
use async_trait::async_trait;
use common::position::LocationUpdate;
use common::proximity::ProximityReport;
use common::target::Target;
use module_core::{EventKind, Module, ModuleCtx, ProximityReportPtr};
use std::{mem::discriminant, result::Result};
use tracing::{debug, error, info};

/// The `ProximityMonitor` module tracks how far the user is away from the
/// configured [`Target`].
///
/// Every location update on the bus is reduced into a new
/// [`ProximityReport`] which is published as
/// [`EventKind::ProximityReportEvent`]. The latest report is the only state
/// the module keeps.
pub struct ProximityMonitor {
    ctx: ModuleCtx,
    target: Target,
    report: ProximityReport,
}

impl ProximityMonitor {
    /// Creates a new `ProximityMonitor` in the [`Unknown`](common::proximity::ProximityState::Unknown) state.
    pub fn new(ctx: ModuleCtx, target: Target) -> Self {
        ProximityMonitor {
            ctx,
            target,
            report: ProximityReport::default(),
        }
    }

    pub fn report(&self) -> &ProximityReport {
        &self.report
    }

    /// Applies a location update and returns the new report.
    pub fn handle_update(&mut self, update: &LocationUpdate) -> &ProximityReport {
        let previous = self.report;
        self.report = reduce_location_update(&previous, update, &self.target);

        match (update, self.report.distance) {
            (LocationUpdate::Fix(_), Some(distance)) => debug!(
                "Distance: {:.1}m | In range: {}",
                distance,
                self.report.state.is_action_enabled()
            ),
            (LocationUpdate::Error(e), _) => match e.code() {
                Some(code) => error!("Geolocation error {code}: {e}"),
                None => error!("Geolocation error: {e}"),
            },
            _ => (),
        }
        if discriminant(&previous.state) != discriminant(&self.report.state) {
            info!(
                "Proximity state changed from {:?} to {:?}",
                previous.state, self.report.state
            );
        }
        &self.report
    }

    fn publish_report(&self) {
        let _ = self.ctx.publish_event(EventKind::ProximityReportEvent(
            ProximityReportPtr::new(self.report),
        ));
    }
}

#[async_trait]
impl Module for ProximityMonitor {
    /// Runs the `ProximityMonitor` module's main event loop.
    ///
    /// The initial [`Unknown`](common::proximity::ProximityState::Unknown) report is published on start,
    /// afterwards one report per location update. The loop terminates when a
    /// `QuitEvent` is received.
    async fn run(&mut self) -> Result<(), ()> {
        info!(
            "Watching target lat: {}, long: {} with trigger radius {}m",
            self.target.position().latitude,
            self.target.position().longitude,
            self.target.trigger_radius()
        );
        self.publish_report();
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::LocationUpdateEvent(update) => {
                                    self.handle_update(&update);
                                    self.publish_report();
                                }
                                _ => (),
                            }
                        }
                        Err(e) => error!("Failed to receive event. Error {}", e)
                    }
                }
            }
        }
        Ok(())
    }
}
