use crate::{position::Position, target::Target};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use thiserror::Error;

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid target coordinate lat: {latitude}, long: {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid trigger radius {0}, expected a finite value >= 0")]
    InvalidRadius(f64),
}

/// Raw target section of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Trigger radius in meters.
    pub trigger_radius: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            latitude: 6.8206,
            longitude: 80.0390,
            trigger_radius: 50.0,
        }
    }
}

impl TargetConfig {
    /// Validates the section and converts it into a [`Target`].
    pub fn to_target(&self) -> Result<Target, ConfigError> {
        Target::new(
            Position::new(self.latitude, self.longitude),
            self.trigger_radius,
        )
    }
}

/// Options handed to a location provider when the watch is started.
///
/// The defaults are high accuracy, no cached positions and a timeout of
/// five seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub high_accuracy: bool,

    /// Fixes older than this are dropped. Zero disables the check.
    #[serde(rename = "maximum_age_ms", with = "crate::serde::duration_ms")]
    pub maximum_age: Duration,

    /// Longest wait for the next fix before a timeout is reported. Zero waits forever.
    #[serde(rename = "timeout_ms", with = "crate::serde::duration_ms")]
    pub timeout: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        LocationOptions {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: Duration::from_millis(5000),
        }
    }
}

/// The complete configuration of the proximity trigger.
///
/// # Example
///
/// ```rust
/// use common::config::ProximityConfig;
///
/// let config = ProximityConfig::from_json(r#"{ "target": { "trigger_radius": 25.0 } }"#).unwrap();
/// assert_eq!(config.target.trigger_radius, 25.0);
/// assert!(config.location.high_accuracy);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub target: TargetConfig,
    pub location: LocationOptions,
}

impl ProximityConfig {
    /// Parses a configuration from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        ProximityConfig::from_json(&content)
    }

    /// Replaces the target values that are `Some`.
    ///
    /// The result isn't validated, [`ProximityConfig::target`] does that.
    pub fn with_overrides(
        mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        trigger_radius: Option<f64>,
    ) -> Self {
        if let Some(latitude) = latitude {
            self.target.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            self.target.longitude = longitude;
        }
        if let Some(trigger_radius) = trigger_radius {
            self.target.trigger_radius = trigger_radius;
        }
        self
    }

    /// Shortcut for [`TargetConfig::to_target`].
    pub fn target(&self) -> Result<Target, ConfigError> {
        self.target.to_target()
    }
}
