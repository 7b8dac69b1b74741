use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::{Result, storage::Persistence};

/// Memory backed [`Persistence`]. Clones share the same underlying map, which lets tests observe
/// what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with `value` already present under `key`
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.values.write().insert(key.into(), value.into());
        storage
    }
}

impl Persistence for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.into(), value.into());
        Ok(())
    }
}
