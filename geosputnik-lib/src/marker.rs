use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::projection::{Geographic, Projected};

/// Primary key of a [`Marker`], derived from its creation time in milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MarkerId(i64);

impl MarkerId {
    /// Allocate an id for a marker created at `now`.
    ///
    /// Ids follow the creation timestamp, but are always strictly greater than every id in
    /// `existing`, so two markers created within the same millisecond (or after a clock step
    /// backwards) never collide.
    pub fn fresh<'a>(now: DateTime<Utc>, existing: impl IntoIterator<Item = &'a Marker>) -> Self {
        let stamp = now.timestamp_millis();
        let next = existing
            .into_iter()
            .map(|m| m.id.0.saturating_add(1))
            .max()
            .map_or(stamp, |floor| floor.max(stamp));

        Self(next)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// A user-created point of interest. Immutable once created.
///
/// The serialized field names are the storage format and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "sk42x")]
    pub projected_x: f64,
    #[serde(rename = "sk42y")]
    pub projected_y: f64,
    pub description: String,
}

impl Marker {
    pub fn new(
        id: MarkerId,
        position: Geographic,
        projected: Projected,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            longitude: position.lon,
            latitude: position.lat,
            projected_x: projected.x,
            projected_y: projected.y,
            description: description.into(),
        }
    }

    pub fn position(&self) -> Geographic {
        Geographic::new(self.longitude, self.latitude)
    }

    pub fn projected(&self) -> Projected {
        Projected::new(self.projected_x, self.projected_y)
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn marker(id: i64) -> Marker {
        Marker::new(
            MarkerId::from(id),
            Geographic::new(37.0, 55.0),
            Projected::new(1.0, 2.0),
            "test",
        )
    }

    #[test]
    fn test_fresh_uses_timestamp() {
        assert_eq!(MarkerId::fresh(at(1_700_000_000_000), []).value(), 1_700_000_000_000);
    }

    #[test]
    fn test_fresh_never_collides() {
        let existing = [marker(1_000), marker(1_005)];

        // Clock hasn't moved past the newest marker
        assert_eq!(MarkerId::fresh(at(1_005), &existing).value(), 1_006);
        // Clock went backwards
        assert_eq!(MarkerId::fresh(at(10), &existing).value(), 1_006);
        // Clock is ahead
        assert_eq!(MarkerId::fresh(at(2_000), &existing).value(), 2_000);
    }

    #[test]
    fn test_storage_field_names() {
        let json = serde_json::to_value(marker(42)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 42,
                "lon": 37.0,
                "lat": 55.0,
                "sk42x": 1.0,
                "sk42y": 2.0,
                "description": "test",
            })
        );
    }
}
