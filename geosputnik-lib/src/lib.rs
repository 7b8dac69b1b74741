//! Marker persistence, SK-42 conversion and map/list synchronization for the
//! Geosputnik map viewer.
//!
//! The [`MarkerStore`] owns the persisted marker collection. Everything drawn
//! on screen (the map overlay and the marker list) is rebuilt from a store
//! snapshot by [`MarkerSync`] after every mutation.

use thiserror::Error;

pub mod banner;
pub mod compass;
pub mod config;
pub mod fs;
pub mod marker;
pub mod offline;
pub mod projection;
pub mod share;
pub mod storage;
pub mod store;
pub mod sync;
pub mod view;

pub use config::CoreConfig;
pub use marker::{Marker, MarkerId};
pub use projection::{Converter, Geographic, Projected, Sk42Converter};
pub use store::MarkerStore;
pub use sync::{MarkerSync, UiEvent};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
    #[error("Projection setup failed: {0}")]
    ProjectionSetup(String),
    #[error("Coordinate transform failed: {0}")]
    Transform(String),
    #[error("Coordinate out of range: lon {lon}, lat {lat}")]
    OutOfRange { lon: f64, lat: f64 },
    #[error("Coordinate converter is unavailable")]
    ConverterUnavailable,
    #[error("A marker with id {0} already exists")]
    DuplicateId(MarkerId),
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Could not determine the {0} directory")]
    NoHomeDir(&'static str),
}
