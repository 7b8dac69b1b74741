//! Key-value persistence port used by the [`MarkerStore`](crate::MarkerStore).
//!
//! A value is an opaque string. Writers replace the whole value; there is no versioning or
//! compare-and-swap, so concurrent writers sharing a backend resolve as last-writer-wins.

use crate::Result;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub trait Persistence {
    /// Read the value stored under `key`, or `None` if nothing has been written yet.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}
