use crate::{LocationSourceError, is_fix_fresh, publish_update, run_until_quit};
use chrono::{DateTime, Utc};
use common::config::LocationOptions;
use common::location_error::LocationError;
use common::position::{LocationFix, LocationUpdate, Position};
use futures::StreamExt;
use gpsd_proto::{self, Mode, Tpv};
use module_core::{Event, Module, ModuleCtx};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Notify;
use tokio::time::{Instant, timeout_at};
use tokio::{io::AsyncWriteExt, net::TcpStream};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error};

/// Converts a gpsd TPV report into a location update.
///
/// * `NoFix` reports [`LocationError::PositionUnavailable`].
/// * With [`LocationOptions::high_accuracy`] only 3D fixes are accepted.
/// * Reports without coordinates and stale fixes are ignored.
///
/// The TPV time is used as fix timestamp, `now` if the report has none.
pub fn tpv_to_update(
    tpv: &Tpv,
    options: &LocationOptions,
    now: DateTime<Utc>,
) -> Option<LocationUpdate> {
    match tpv.mode {
        Mode::NoFix => return Some(LocationUpdate::Error(LocationError::PositionUnavailable)),
        Mode::Fix2d if options.high_accuracy => {
            debug!("Ignoring 2D fix, high accuracy requested");
            return None;
        }
        Mode::Fix2d | Mode::Fix3d => (),
    }
    let lat = tpv.lat?;
    let lon = tpv.lon?;
    let timestamp = tpv
        .time
        .as_deref()
        .and_then(|time| DateTime::<Utc>::from_str(time).ok())
        .unwrap_or(now);
    let fix = LocationFix::new(Position::new(lat, lon), None, timestamp);
    if !is_fix_fresh(&fix, options, now) {
        debug!("Ignoring stale fix from {timestamp}");
        return None;
    }
    Some(LocationUpdate::Fix(fix))
}

/// GPSD daemon based location source
struct GpsdLocationRuntime {
    options: LocationOptions,
    /// The start signal for the GPSD task to start execution
    notify: Arc<Notify>,
    /// The sender of the event_bus to emit the events
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl GpsdLocationRuntime {
    fn next_deadline(&self) -> Option<Instant> {
        if self.options.timeout.is_zero() {
            return None;
        }
        Some(Instant::now() + self.options.timeout)
    }
}

async fn gpsd_reader(mut stream: TcpStream, runtime: GpsdLocationRuntime) {
    runtime.notify.notified().await;
    if let Err(e) = stream
        .write_all(gpsd_proto::ENABLE_WATCH_CMD.as_bytes())
        .await
    {
        error!("Failed to enable gpsd watch. Error: {e}");
        publish_update(
            &runtime.sender,
            LocationUpdate::Error(LocationError::PositionUnavailable),
        );
        return;
    }
    let mut framed = Framed::new(stream, LinesCodec::new());
    let mut deadline = runtime.next_deadline();
    loop {
        let next = match deadline {
            Some(at) => match timeout_at(at, framed.next()).await {
                Ok(next) => next,
                Err(_) => {
                    publish_update(&runtime.sender, LocationUpdate::Error(LocationError::Timeout));
                    deadline = runtime.next_deadline();
                    continue;
                }
            },
            None => framed.next().await,
        };
        match next {
            Some(Ok(ref line)) => {
                let Ok(tpv) = serde_json::from_str::<Tpv>(line) else {
                    continue;
                };
                if let Some(update) = tpv_to_update(&tpv, &runtime.options, Utc::now()) {
                    publish_update(&runtime.sender, update);
                    deadline = runtime.next_deadline();
                }
            }
            Some(Err(e)) => {
                error!("GPSD receive error {e:?}");
            }
            None => {
                error!("GPSD closed the connection");
                publish_update(
                    &runtime.sender,
                    LocationUpdate::Error(LocationError::PositionUnavailable),
                );
                return;
            }
        }
    }
}

/// Location provider backed by a gpsd daemon.
pub struct GpsdModule {
    ctx: ModuleCtx,
    gpsd_handle: tokio::task::JoinHandle<()>,
    task_notify: Arc<Notify>,
}

impl GpsdModule {
    /// Connects to the gpsd daemon at `address`.
    ///
    /// The watch is enabled once the module runs.
    pub async fn new(
        ctx: ModuleCtx,
        address: &str,
        options: LocationOptions,
    ) -> Result<Self, LocationSourceError> {
        let address: SocketAddr = address.parse()?;
        let socket = TcpStream::connect(address).await?;
        let rt = GpsdLocationRuntime {
            options,
            notify: Arc::new(Notify::new()),
            sender: ctx.sender.clone(),
        };
        let notify = rt.notify.clone();
        let gpsd_reader_task_handle = tokio::spawn(async move { gpsd_reader(socket, rt).await });
        Ok(GpsdModule {
            ctx,
            gpsd_handle: gpsd_reader_task_handle,
            task_notify: notify,
        })
    }
}

#[async_trait::async_trait]
impl Module for GpsdModule {
    async fn run(&mut self) -> Result<(), ()> {
        self.task_notify.notify_one();
        run_until_quit(&mut self.ctx, &self.gpsd_handle, "GpsdModule").await
    }
}
