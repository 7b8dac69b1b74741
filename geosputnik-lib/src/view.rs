//! The marker list shown next to the map.

use crate::marker::{Marker, MarkerId};

/// One rendered row of the marker list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Target of the row's delete action
    pub id: MarkerId,
    pub description: String,
    /// Projected easting, rounded to two decimals
    pub x: String,
    /// Projected northing, rounded to two decimals
    pub y: String,
}

impl ListEntry {
    fn new(marker: &Marker) -> Self {
        Self {
            id: marker.id,
            description: marker.description.clone(),
            x: format!("{:.2}", marker.projected_x),
            y: format!("{:.2}", marker.projected_y),
        }
    }

    pub fn coordinates(&self) -> String {
        format!("SK-42: X: {}, Y: {}", self.x, self.y)
    }
}

/// Snapshot of the list, built from the full store contents in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListModel {
    entries: Vec<ListEntry>,
}

impl ListModel {
    pub fn from_markers(markers: &[Marker]) -> Self {
        Self {
            entries: markers.iter().map(ListEntry::new).collect(),
        }
    }

    /// An empty list hides its container instead of rendering an empty one.
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }
}

/// Front-end that draws a [`ListModel`]. Each call replaces whatever was drawn before.
pub trait ListRenderer {
    fn render(&mut self, list: &ListModel);
}
