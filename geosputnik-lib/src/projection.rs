//! WGS-84 to SK-42 conversion.
//!
//! The projection math is delegated to `proj4rs`; this module only owns the fixed parameter set
//! of the target system and the shape of the coordinates passed around the crate.

use std::fmt::{self, Display, Formatter};

use proj4rs::{Proj, transform::transform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// A geographic coordinate in WGS-84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geographic {
    pub lon: f64,
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A projected SK-42 coordinate in metres. `x` is the easting, `y` the northing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
}

impl Projected {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Display for Projected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "X: {:.2}, Y: {:.2}", self.x, self.y)
    }
}

/// Converts geographic coordinates into the projected display system.
pub trait Converter {
    fn project(&self, position: Geographic) -> Result<Projected>;
}

/// Parameters of the Transverse Mercator target system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: String,
    /// Seven parameter Helmert shift to WGS-84
    pub towgs84: [f64; 7],
}

impl Default for ProjectionParams {
    /// SK-42 on the 39°E meridian, without a zone prefix in the false easting.
    fn default() -> Self {
        Self {
            latitude_of_origin: 0.0,
            central_meridian: 39.0,
            scale_factor: 1.0,
            false_easting: 2_500_000.0,
            false_northing: 0.0,
            ellipsoid: "krass".into(),
            towgs84: [23.92, -141.27, -80.9, 0.0, 0.35, 0.82, -0.12],
        }
    }
}

impl ProjectionParams {
    pub fn to_proj_string(&self) -> String {
        let towgs84 = self
            .towgs84
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k={} +x_0={} +y_0={} +ellps={} +towgs84={} +units=m +no_defs",
            self.latitude_of_origin,
            self.central_meridian,
            self.scale_factor,
            self.false_easting,
            self.false_northing,
            self.ellipsoid,
            towgs84,
        )
    }
}

/// [`Converter`] backed by `proj4rs`.
pub struct Sk42Converter {
    source: Proj,
    target: Proj,
}

impl Sk42Converter {
    pub fn new(params: &ProjectionParams) -> Result<Self> {
        let definition = params.to_proj_string();
        debug!("Configuring SK-42 projection: {definition}");

        let source = Proj::from_proj_string(WGS84)
            .map_err(|e| Error::ProjectionSetup(format!("WGS-84: {e:?}")))?;
        let target = Proj::from_proj_string(&definition)
            .map_err(|e| Error::ProjectionSetup(format!("{definition}: {e:?}")))?;

        Ok(Self { source, target })
    }
}

impl Converter for Sk42Converter {
    fn project(&self, position: Geographic) -> Result<Projected> {
        if !position.is_valid() {
            return Err(Error::OutOfRange {
                lon: position.lon,
                lat: position.lat,
            });
        }

        // proj4rs works in radians for geographic systems
        let mut point = (position.lon.to_radians(), position.lat.to_radians(), 0.0);
        transform(&self.source, &self.target, &mut point)
            .map_err(|e| Error::Transform(format!("{e:?}")))?;

        if !point.0.is_finite() || !point.1.is_finite() {
            return Err(Error::Transform(format!(
                "non-finite result for lon {}, lat {}",
                position.lon, position.lat
            )));
        }

        Ok(Projected::new(point.0, point.1))
    }
}
