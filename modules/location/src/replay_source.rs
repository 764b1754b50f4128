use crate::{LocationSourceError, is_fix_fresh, publish_update, run_until_quit};
use chrono::{TimeDelta, Utc};
use common::config::LocationOptions;
use common::location_error::LocationError;
use common::position::{LocationFix, LocationUpdate, Position};
use futures::StreamExt;
use module_core::{Event, Module, ModuleCtx};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReplayRecord {
    Fix {
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        delay_ms: Option<u64>,
        age_ms: Option<u64>,
    },
    Error {
        error: u16,
        delay_ms: Option<u64>,
    },
}

/// One line of a replay file.
///
/// A line is either a fix
/// `{"latitude": 6.8206, "longitude": 80.039, "accuracy": 5.0, "delay_ms": 1000, "age_ms": 0}`
/// or a provider error with a Geolocation API code
/// `{"error": 1, "delay_ms": 500}`. `accuracy`, `delay_ms` and `age_ms` are optional.
/// Unknown error codes are reported as [`LocationError::PositionUnavailable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayRecord {
    /// Time to wait before the record is delivered, `None` for the module interval.
    pub delay: Option<Duration>,
    /// How old a fix already is when it's delivered.
    pub age: Duration,
    pub update: LocationUpdate,
}

impl ReplayRecord {
    /// Parses one line of a replay file.
    ///
    /// Fixes are stamped with the parse time, [`ReplayLocationModule`] restamps
    /// them on delivery.
    pub fn parse(line: &str) -> Result<Self, LocationSourceError> {
        let record = match serde_json::from_str::<RawReplayRecord>(line)? {
            RawReplayRecord::Fix {
                latitude,
                longitude,
                accuracy,
                delay_ms,
                age_ms,
            } => ReplayRecord {
                delay: delay_ms.map(Duration::from_millis),
                age: Duration::from_millis(age_ms.unwrap_or(0)),
                update: LocationUpdate::Fix(LocationFix::new(
                    Position::new(latitude, longitude),
                    accuracy,
                    Utc::now(),
                )),
            },
            RawReplayRecord::Error { error, delay_ms } => {
                let location_error = LocationError::from_code(error).unwrap_or_else(|| {
                    warn!("Unknown geolocation error code {error}, reporting position unavailable");
                    LocationError::PositionUnavailable
                });
                ReplayRecord {
                    delay: delay_ms.map(Duration::from_millis),
                    age: Duration::ZERO,
                    update: LocationUpdate::Error(location_error),
                }
            }
        };
        Ok(record)
    }
}

struct ReplayLocationRuntime {
    options: LocationOptions,
    interval: Duration,
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl ReplayLocationRuntime {
    /// Waits for the record delay and delivers the record.
    ///
    /// A delay longer than the watch timeout reports [`LocationError::Timeout`]
    /// once the timeout elapsed, the record follows after the rest of the delay.
    async fn deliver(&self, record: ReplayRecord) {
        let delay = record.delay.unwrap_or(self.interval);
        if !self.options.timeout.is_zero() && delay > self.options.timeout {
            tokio::time::sleep(self.options.timeout).await;
            publish_update(&self.sender, LocationUpdate::Error(LocationError::Timeout));
            tokio::time::sleep(delay - self.options.timeout).await;
        } else {
            tokio::time::sleep(delay).await;
        }

        match record.update {
            LocationUpdate::Fix(fix) => {
                let now = Utc::now();
                let age = TimeDelta::from_std(record.age).unwrap_or(TimeDelta::zero());
                let fix = LocationFix::new(fix.to_position(), fix.accuracy(), now - age);
                if !is_fix_fresh(&fix, &self.options, now) {
                    debug!("Dropping stale fix {:?}", fix);
                    return;
                }
                publish_update(&self.sender, LocationUpdate::Fix(fix));
            }
            LocationUpdate::Error(e) => publish_update(&self.sender, LocationUpdate::Error(e)),
        }
    }
}

async fn replay_reader(file: tokio::fs::File, runtime: ReplayLocationRuntime) {
    let mut lines = FramedRead::new(file, LinesCodec::new());
    let mut line_number = 0_usize;
    while let Some(result) = lines.next().await {
        line_number += 1;
        match result {
            Ok(ref line) if line.trim().is_empty() => continue,
            Ok(ref line) => match ReplayRecord::parse(line) {
                Ok(record) => runtime.deliver(record).await,
                Err(e) => warn!("Skipping replay line {line_number}. Error: {e}"),
            },
            Err(e) => {
                error!("Replay receive error {e:?}");
                break;
            }
        }
    }
    info!("Replay finished after {line_number} lines");
}

/// Location provider that replays fixes and errors from a JSON-lines file.
///
/// The file is replayed once, afterwards the module stays idle until it is
/// stopped.
pub struct ReplayLocationModule {
    ctx: ModuleCtx,
    path: PathBuf,
    options: LocationOptions,
    interval: Duration,
}

impl ReplayLocationModule {
    /// Creates the module.
    ///
    /// `interval` is the delay of records without a `delay_ms`. The file is
    /// checked for existence, it's opened when the module starts running.
    pub fn new(
        ctx: ModuleCtx,
        path: impl Into<PathBuf>,
        options: LocationOptions,
        interval: Duration,
    ) -> Result<Self, LocationSourceError> {
        let path = path.into();
        if !path.is_file() {
            return Err(LocationSourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("replay file {} not found", path.display()),
            )));
        }
        Ok(ReplayLocationModule {
            ctx,
            path,
            options,
            interval,
        })
    }
}

#[async_trait::async_trait]
impl Module for ReplayLocationModule {
    async fn run(&mut self) -> Result<(), ()> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            error!("Failed to open replay file {}. Error: {e}", self.path.display());
        })?;
        let runtime = ReplayLocationRuntime {
            options: self.options,
            interval: self.interval,
            sender: self.ctx.sender.clone(),
        };
        let replay_task_handle = tokio::spawn(async move { replay_reader(file, runtime).await });
        run_until_quit(&mut self.ctx, &replay_task_handle, "ReplayLocationModule").await
    }
}
