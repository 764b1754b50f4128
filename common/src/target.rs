use crate::{config::ConfigError, position::Position};

/// The fixed point the user has to approach.
///
/// A target consists of a coordinate and the trigger radius in meters. It is
/// created once at startup and never changes afterwards, therefore the
/// fields are only readable.
///
/// # Example
///
/// ```rust
/// use common::{position::Position, target::Target};
///
/// let target = Target::new(Position::new(6.8206, 80.0390), 50.0).unwrap();
/// assert_eq!(target.trigger_radius(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    position: Position,
    trigger_radius: f64,
}

impl Target {
    /// Creates a new [`Target`].
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidCoordinate`] – The position is outside of the valid degree ranges.
    /// * [`ConfigError::InvalidRadius`] – The radius is negative, NaN or infinite.
    pub fn new(position: Position, trigger_radius: f64) -> Result<Self, ConfigError> {
        if !position.is_valid() {
            return Err(ConfigError::InvalidCoordinate {
                latitude: position.latitude,
                longitude: position.longitude,
            });
        }
        if !trigger_radius.is_finite() || trigger_radius < 0.0 {
            return Err(ConfigError::InvalidRadius(trigger_radius));
        }
        Ok(Target {
            position,
            trigger_radius,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Radius in meters inside which the user counts as in range.
    pub fn trigger_radius(&self) -> f64 {
        self.trigger_radius
    }
}
