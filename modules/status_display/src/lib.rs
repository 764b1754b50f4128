// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Status display Modul for the proximity trigger
//!
//! Renders [`ProximityReport`]s into the texts of the user interface and hands
//! them to a [`StatusSink`].

use async_trait::async_trait;
use common::fixed::to_fixed;
use common::proximity::ProximityReport;
use module_core::{EventKind, Module, ModuleCtx};
use std::fmt;
use tracing::{error, info};

/// The rendered texts of one proximity report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusView {
    pub latitude: String,
    pub longitude: String,
    /// Distance to the target in meters.
    pub distance: String,
    pub status: String,
    /// Whether the AR action control is enabled.
    pub action_enabled: bool,
}

fn fixed_or_dash(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "--".to_string(), |v| to_fixed(v, decimals))
}

impl StatusView {
    /// Renders a report.
    ///
    /// Coordinates use 4 decimals, the distance 1 decimal. Values without a
    /// reading are shown as `--`.
    ///
    /// ```rust
    /// use common::proximity::ProximityReport;
    /// use status_display::StatusView;
    ///
    /// let view = StatusView::from_report(&ProximityReport::default());
    /// assert_eq!(view.distance, "--");
    /// assert_eq!(view.status, "Requesting location...");
    /// ```
    pub fn from_report(report: &ProximityReport) -> Self {
        StatusView {
            latitude: fixed_or_dash(report.position.map(|p| p.latitude), 4),
            longitude: fixed_or_dash(report.position.map(|p| p.longitude), 4),
            distance: fixed_or_dash(report.distance, 1),
            status: report.state.message(),
            action_enabled: report.state.is_action_enabled(),
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat: {} | lon: {} | distance: {}m | {} | AR {}",
            self.latitude,
            self.longitude,
            self.distance,
            self.status,
            if self.action_enabled {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}

/// The render layer a [`StatusDisplay`] draws on.
pub trait StatusSink: Send {
    fn show(&mut self, view: &StatusView);
}

/// Prints every view as one line on stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn show(&mut self, view: &StatusView) {
        println!("{view}");
    }
}

/// Module that renders every [`EventKind::ProximityReportEvent`] into its sink.
pub struct StatusDisplay<S: StatusSink = ConsoleSink> {
    ctx: ModuleCtx,
    sink: S,
    last_view: Option<StatusView>,
}

impl StatusDisplay<ConsoleSink> {
    pub fn new(ctx: ModuleCtx) -> Self {
        StatusDisplay::new_with_sink(ctx, ConsoleSink)
    }
}

impl<S: StatusSink> StatusDisplay<S> {
    pub fn new_with_sink(ctx: ModuleCtx, sink: S) -> Self {
        StatusDisplay {
            ctx,
            sink,
            last_view: None,
        }
    }

    fn on_report(&mut self, report: &ProximityReport) {
        let view = StatusView::from_report(report);
        let was_enabled = self.last_view.as_ref().is_some_and(|v| v.action_enabled);
        if view.action_enabled && !was_enabled {
            info!("Action control enabled, AR session can be started");
        } else if !view.action_enabled && was_enabled {
            info!("Action control disabled");
        }
        self.sink.show(&view);
        self.last_view = Some(view);
    }
}

#[async_trait]
impl<S: StatusSink> Module for StatusDisplay<S> {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::ProximityReportEvent(report) => self.on_report(&report),
                                _ => (),
                            }
                        }
                        Err(e) => error!("Failed to receive event in module StatusDisplay. Error:{e}"),
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
