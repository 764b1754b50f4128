use clap::{CommandFactory, Parser};
use common::config::ProximityConfig;
use common::location_error::LocationError;
use common::position::Position;
use common::proximity::{ProximityReport, ProximityState};
use dirs::config_dir;
use location::{
    constant_source::ConstantLocationModule, gpsd_source::GpsdModule,
    replay_source::ReplayLocationModule,
};
use module_core::{Event, EventBus, EventKind, Module, run_or_quit};
use proximity::ProximityMonitor;
use status_display::{ConsoleSink, StatusDisplay, StatusSink, StatusView};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file, defaults to <config dir>/gps_proximity/config.json
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, allow_hyphen_values = true)]
    target_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    target_lon: Option<f64>,
    /// Trigger radius in meters
    #[arg(short, long)]
    radius: Option<f64>,
    /// CSV file with waypoints (longitude,latitude) to walk along
    #[arg(short = 'f', long)]
    gps_source_file: Option<PathBuf>,
    /// Walking speed along the waypoints in m/s
    #[arg(long, default_value_t = 1.4)]
    velocity: f64,
    /// JSON-lines file with fixes and provider errors to replay
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Address of the gpsd daemon
    #[arg(short = 'd', long, num_args = 0..=1, default_missing_value = "127.0.0.1:2947")]
    gpsd: Option<String>,
    /// Time between two simulated fixes in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

fn read_waypoints_from_file(file_path: &Path) -> Result<Vec<Position>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open waypoint file {}. Error: {e}", file_path.display());
    })?;
    let mut positions = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| error!("Failed to read waypoint. Error: {e}"))?;
        let (Some(longitude), Some(latitude)) = (record.get(0), record.get(1)) else {
            error!("Waypoint record {:?} needs longitude and latitude", record);
            return Err(());
        };
        let longitude = f64::from_str(longitude.trim())
            .map_err(|e| error!("Invalid longitude {longitude}. Error: {e}"))?;
        let latitude = f64::from_str(latitude.trim())
            .map_err(|e| error!("Invalid latitude {latitude}. Error: {e}"))?;
        positions.push(Position {
            longitude,
            latitude,
        });
    }
    debug!("length of positions: {}", positions.len());
    Ok(positions)
}

fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push("gps_proximity");
    path.push("config.json");
    Some(path)
}

fn load_config(cli: &Cli) -> Result<ProximityConfig, ()> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|path| path.is_file()),
    };
    let config = match path {
        Some(path) => {
            info!("Loading configuration {}", path.display());
            ProximityConfig::from_file(&path).map_err(|e| {
                error!("Failed to load configuration {}. Error: {e}", path.display());
            })?
        }
        None => ProximityConfig::default(),
    };
    Ok(config.with_overrides(cli.target_lat, cli.target_lon, cli.radius))
}

fn provider_unsupported_view() -> StatusView {
    StatusView::from_report(&ProximityReport {
        state: ProximityState::Error(LocationError::ProviderUnsupported),
        ..ProximityReport::default()
    })
}

async fn create_location_module(
    eb: &EventBus,
    cli: &Cli,
    config: &ProximityConfig,
) -> Result<Option<Box<dyn Module>>, ()> {
    let interval = Duration::from_millis(cli.interval_ms);
    if let Some(address) = &cli.gpsd {
        return match GpsdModule::new(eb.context(), address, config.location).await {
            Ok(gpsd) => Ok(Some(Box::new(gpsd))),
            Err(e) => {
                error!("Failed to connect to gpsd!. Error: {}", e);
                Err(())
            }
        };
    }
    if let Some(replay_file) = &cli.replay {
        return match ReplayLocationModule::new(
            eb.context(),
            replay_file.clone(),
            config.location,
            interval,
        ) {
            Ok(replay) => Ok(Some(Box::new(replay))),
            Err(e) => {
                error!("Failed to create ReplayLocationModule. Error: {}", e);
                Err(())
            }
        };
    }
    if let Some(source_file) = &cli.gps_source_file {
        let positions = read_waypoints_from_file(source_file)?;
        return match ConstantLocationModule::new(eb.context(), &positions, cli.velocity, interval)
        {
            Ok(walk) => Ok(Some(Box::new(walk))),
            Err(e) => {
                error!("Failed to create ConstantLocationModule. Error: {}", e);
                Err(())
            }
        };
    }
    Ok(None)
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config(&cli)?;
    let target = config
        .target()
        .map_err(|e| error!("Invalid target configuration. Error: {e}"))?;
    let eb = EventBus::default();
    let Some(mut location) = create_location_module(&eb, &cli, &config).await? else {
        error!("No location source specified. Use --gps-source-file, --replay or --gpsd");
        ConsoleSink.show(&provider_unsupported_view());
        let _ = Cli::command().print_help();
        return Err(());
    };

    let quit_sender = eb.context().sender;
    ctrlc::set_handler(move || {
        info!("Stopping modules...");
        let _ = quit_sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| error!("Failed to install Ctrl-C handler. Error: {e}"))?;

    let mut monitor = ProximityMonitor::new(eb.context(), target);
    let mut display = StatusDisplay::new(eb.context());

    info!("Starting modules...");
    let (location_result, monitor_result, display_result) = tokio::join!(
        run_or_quit(location.as_mut(), &eb),
        run_or_quit(&mut monitor, &eb),
        run_or_quit(&mut display, &eb)
    );
    location_result.and(monitor_result).and(display_result)
}

#[cfg(test)]
mod tests;
