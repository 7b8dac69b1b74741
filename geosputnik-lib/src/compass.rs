//! Device heading readout shown next to the map.

use std::fmt::{self, Display, Formatter};

/// What the compass readout currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompassStatus {
    /// Heading in degrees clockwise from north, as reported by the device
    Heading(f64),
    /// The sensor is present but did not report a heading
    Unavailable,
    /// The platform has no orientation sensor
    Unsupported,
    /// The user refused access to the sensor
    Denied,
}

impl CompassStatus {
    pub fn from_reading(alpha: Option<f64>) -> Self {
        match alpha {
            Some(alpha) if alpha.is_finite() => Self::Heading(alpha),
            _ => Self::Unavailable,
        }
    }
}

impl Display for CompassStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // Adding zero turns -0 into 0
            Self::Heading(alpha) => write!(f, "Compass: {}°", alpha.round().rem_euclid(360.0) + 0.0),
            Self::Unavailable => write!(f, "Compass: unavailable"),
            Self::Unsupported => write!(f, "Compass: not supported"),
            Self::Denied => write!(f, "Compass: access denied"),
        }
    }
}
