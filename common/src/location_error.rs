use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a location provider.
///
/// Every variant is terminal for the update cycle it belongs to. The display
/// text is the status message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationError {
    /// The user refused access to the location.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The provider could not determine a position.
    #[error("Location unavailable")]
    PositionUnavailable,

    /// No position was delivered within the configured timeout.
    #[error("Location timeout")]
    Timeout,

    /// There is no location provider at all.
    #[error("Geolocation not supported")]
    ProviderUnsupported,
}

impl LocationError {
    /// Maps a Geolocation API error code to a [`LocationError`].
    ///
    /// Codes `1`, `2` and `3` are permission denied, position unavailable and
    /// timeout. Every other code returns `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(LocationError::PermissionDenied),
            2 => Some(LocationError::PositionUnavailable),
            3 => Some(LocationError::Timeout),
            _ => None,
        }
    }

    /// The Geolocation API error code, `None` for [`LocationError::ProviderUnsupported`].
    pub fn code(&self) -> Option<u16> {
        match self {
            LocationError::PermissionDenied => Some(1),
            LocationError::PositionUnavailable => Some(2),
            LocationError::Timeout => Some(3),
            LocationError::ProviderUnsupported => None,
        }
    }
}
