// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Location Modul for the proximity trigger
//!
//! Provides the location providers. Every provider is a [`module_core::Module`]
//! that publishes [`EventKind::LocationUpdateEvent`]s at its own cadence until a
//! [`EventKind::QuitEvent`] stops the watch.

use chrono::{DateTime, Utc};
use common::config::LocationOptions;
use common::position::{LocationFix, LocationUpdate};
use module_core::{Event, EventKind, ModuleCtx};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

pub mod constant_source;
pub mod gpsd_source;
pub mod replay_source;

/// Errors raised while creating a location provider.
#[derive(Debug, Error)]
pub enum LocationSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid replay record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("positions parameter is empty")]
    EmptyWaypoints,

    #[error("position lat: {latitude}, long: {longitude} can't be converted to an UTM zone")]
    InvalidWaypoint { latitude: f64, longitude: f64 },

    #[error("invalid address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

/// Checks a fix against [`LocationOptions::maximum_age`].
///
/// A zero maximum age accepts every fix. Fixes with a timestamp in the future
/// count as fresh.
pub fn is_fix_fresh(fix: &LocationFix, options: &LocationOptions, now: DateTime<Utc>) -> bool {
    if options.maximum_age.is_zero() {
        return true;
    }
    match (now - fix.timestamp()).to_std() {
        Ok(age) => age <= options.maximum_age,
        Err(_) => true,
    }
}

fn publish_update(sender: &tokio::sync::broadcast::Sender<Event>, update: LocationUpdate) {
    let _ = sender.send(Event {
        kind: EventKind::LocationUpdateEvent(Arc::new(update)),
    });
}

/// Blocks until a quit event arrives, then aborts the provider task.
async fn run_until_quit(
    ctx: &mut ModuleCtx,
    task: &tokio::task::JoinHandle<()>,
    module_name: &str,
) -> Result<(), ()> {
    loop {
        match ctx.receiver.recv().await {
            Ok(event) => {
                if let EventKind::QuitEvent = event.kind {
                    task.abort();
                    return Ok(());
                }
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                error!("{module_name} lagged behind, {skipped} events skipped");
            }
            Err(e) => {
                error!("Failed to receive event in module {module_name}. Error: {e}");
                task.abort();
                return Err(());
            }
        }
    }
}

#[cfg(test)]
mod tests;
