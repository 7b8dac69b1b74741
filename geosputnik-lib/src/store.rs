use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    marker::{Marker, MarkerId},
    storage::Persistence,
};

pub const DEFAULT_KEY: &str = "markers";

/// Durable owner of the marker collection.
///
/// The whole collection lives under a single key as a JSON array. Every mutation reads the full
/// collection, changes it and writes it back. Nothing else may write that key; views are built
/// from the snapshots returned by [`MarkerStore::load_all`].
#[derive(Debug, Clone)]
pub struct MarkerStore<P> {
    storage: P,
    key: String,
}

impl<P: Persistence> MarkerStore<P> {
    pub fn new(storage: P) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    pub fn with_key(storage: P, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// All markers in insertion order.
    ///
    /// A missing, unreadable or malformed value yields an empty collection rather than an error.
    pub fn load_all(&self) -> Vec<Marker> {
        self.read_all().unwrap_or_else(|e| {
            warn!("Could not load markers, treating as empty: {e}");
            Vec::new()
        })
    }

    /// Append `marker` to the end of the collection.
    ///
    /// Fails without writing if the stored value can't be read or parsed. Fails with [`Error::DuplicateId`] if a marker with the same id is already stored.
    pub fn append(&self, marker: Marker) -> Result<()> {
        let mut markers = self.read_all()?;

        if markers.iter().any(|m| m.id == marker.id) {
            return Err(Error::DuplicateId(marker.id));
        }

        info!("Saving marker {}: {}", marker.id, marker.description);
        markers.push(marker);

        self.write_all(&markers)
    }

    /// Remove every marker with `id`. Removing an unknown id is a no-op.
    ///
    /// Fails without writing if the stored value can't be read or parsed.
    pub fn delete_by_id(&self, id: MarkerId) -> Result<()> {
        let mut markers = self.read_all()?;
        let before = markers.len();

        markers.retain(|m| m.id != id);

        if markers.len() == before {
            debug!("No marker with id {id} to delete");
        } else {
            info!("Deleted marker {id}");
        }

        self.write_all(&markers)
    }

    /// Strict read used by mutations, so a value that can't be read is never overwritten.
    fn read_all(&self) -> Result<Vec<Marker>> {
        match self.storage.read(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, markers: &[Marker]) -> Result<()> {
        let raw = serde_json::to_string(markers)?;
        self.storage.write(&self.key, &raw)
    }
}

#[cfg(test)]
impl MarkerStore<crate::storage::MemoryStorage> {
    /// Return a mock [`MarkerStore`] backed by memory
    pub(crate) fn mock() -> Self {
        Self::new(crate::storage::MemoryStorage::new())
    }
}
