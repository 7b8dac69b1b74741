use serde::{Deserialize, Serialize};

use crate::projection::Geographic;

/// How marker points are drawn on the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    pub color: String,
    /// Diameter in pixels
    pub size: u32,
    pub outline_color: String,
    pub outline_width: u32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: "red".into(),
            size: 12,
            outline_color: "white".into(),
            outline_width: 2,
        }
    }
}

/// The map that hosts the marker overlay and the pointer readout.
///
/// Rendering the basemap is entirely up to the implementation; the controller only drives the
/// overlay and the readout.
pub trait MapSurface {
    fn add_overlay_point(&mut self, position: Geographic, style: &PointStyle);

    fn clear_overlay(&mut self);

    /// Replace the text of the coordinate readout
    fn show_readout(&mut self, text: &str);
}
