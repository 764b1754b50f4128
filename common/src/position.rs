use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// The `Position` struct stores a point on Earth in decimal degrees.
/// Latitude values range from -90.0 to 90.0, and longitude values range
/// from -180.0 to 180.0. The range is not enforced on construction, see
/// [`Position::is_valid`].
///
/// # Fields
///
/// - `latitude` – The latitude in decimal degrees (positive for north, negative for south).
/// - `longitude` – The longitude in decimal degrees (positive for east, negative for west).
///
/// # Example
///
/// ```rust
/// use common::position::Position;
///
/// let pos = Position {
///     latitude: 6.8206,
///     longitude: 80.0390,
/// };
///
/// println!("{:?}", pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new [`Position`] with the given latitude and longitude.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::position::Position;
    ///
    /// let pos = Position::new(6.8206, 80.0390);
    /// assert_eq!(pos.latitude, 6.8206);
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are finite and inside the valid
    /// degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A single reading delivered by a location provider.
///
/// Stores the reported coordinate, the optional horizontal accuracy and the
/// UTC timestamp of the fix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    position: Position,
    accuracy: Option<f64>,
    timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Creates a new [`LocationFix`].
    ///
    /// # Arguments
    ///
    /// * `position` – The reported coordinate.
    /// * `accuracy` – Horizontal accuracy in meters, if the provider reports one.
    /// * `timestamp` – Time of the fix in UTC.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::position::{LocationFix, Position};
    ///
    /// let fix = LocationFix::new(Position::new(6.8206, 80.0390), Some(4.5), chrono::Utc::now());
    /// assert_eq!(fix.latitude(), 6.8206);
    /// ```
    pub fn new(position: Position, accuracy: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        LocationFix {
            position,
            accuracy,
            timestamp,
        }
    }

    /// Returns the latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.position.latitude
    }

    /// Returns the longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }

    /// Horizontal accuracy in meters.
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn to_position(&self) -> Position {
        self.position
    }
}

/// The item a location provider emits for every watch callback.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LocationUpdate {
    /// A successful reading.
    Fix(LocationFix),

    /// The provider failed to deliver a reading for this cycle.
    Error(crate::location_error::LocationError),
}
