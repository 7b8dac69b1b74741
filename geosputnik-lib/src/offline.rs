//! Versioned offline cache for the static assets of the viewer.
//!
//! Every cache generation is a directory named after its version tag under a common root. Install
//! fills the current generation from the manifest, activation deletes every other generation, and
//! requests are answered from the cache first with the network as a fallback.

use std::{
    collections::BTreeMap,
    fs,
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Result, config::OfflineSettings, fs::cache_dir};

const INDEX_FILE: &str = "index.json";

/// Network access used to populate the cache.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Maps request urls to the file holding their body, inside one generation directory.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct OfflineCache {
    root: PathBuf,
    version: String,
    origin: String,
    manifest: Vec<String>,
}

impl OfflineCache {
    pub fn new(
        root: impl Into<PathBuf>,
        version: impl Into<String>,
        origin: impl Into<String>,
        manifest: Vec<String>,
    ) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
            origin: origin.into(),
            manifest,
        }
    }

    /// Cache described by the configuration, rooted in the XDG cache directory unless the
    /// configuration names another one.
    pub fn from_settings(settings: &OfflineSettings) -> Result<Self> {
        let root = match &settings.cache_dir {
            Some(dir) => dir.clone(),
            None => cache_dir()?.join("offline"),
        };

        Ok(Self::new(
            root,
            settings.cache_version.clone(),
            settings.origin.clone(),
            settings.manifest.clone(),
        ))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Absolute url for a manifest entry or request. Root-relative urls are resolved against the
    /// configured origin.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.origin.trim_end_matches('/'))
        } else {
            url.to_string()
        }
    }

    /// Fetch every manifest entry into the current generation.
    ///
    /// Nothing is written unless every entry was fetched. Returns the number of cached entries.
    pub async fn install<F: Fetcher>(&self, fetcher: &F) -> Result<usize> {
        let mut bodies = Vec::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let body = fetcher.fetch(&self.resolve(url)).await?;
            debug!("Fetched {url} ({} bytes)", body.len());
            bodies.push((url.clone(), body));
        }

        fs::create_dir_all(&self.root)?;
        let staging = self.root.join(format!(".{}.partial", self.version));
        remove_dir_if_exists(&staging)?;
        fs::create_dir_all(&staging)?;

        let mut index = Index::default();
        for (n, (url, body)) in bodies.into_iter().enumerate() {
            let file = format!("{n}.bin");
            fs::write(staging.join(&file), body)?;
            index.entries.insert(url, file);
        }
        fs::write(staging.join(INDEX_FILE), serde_json::to_vec(&index)?)?;

        let generation = self.generation_dir();
        remove_dir_if_exists(&generation)?;
        fs::rename(&staging, &generation)?;

        info!(
            "Installed {} assets into cache {}",
            index.entries.len(),
            self.version
        );

        Ok(index.entries.len())
    }

    /// Delete every cache generation whose name differs from the current version. Returns the
    /// names of the deleted generations.
    pub fn activate(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut deleted = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name != self.version {
                fs::remove_dir_all(entry.path())?;
                info!("Deleted old cache {name}");
                deleted.push(name);
            }
        }

        deleted.sort();
        Ok(deleted)
    }

    /// The cached body for `url` in the current generation, if any
    pub fn lookup(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let generation = self.generation_dir();
        let index: Index = match fs::read(generation.join(INDEX_FILE)) {
            Ok(raw) => serde_json::from_slice(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match index.entries.get(url) {
            Some(file) => Ok(Some(fs::read(generation.join(file))?)),
            None => Ok(None),
        }
    }

    /// Answer a request from the cache, falling back to the network. Network responses are not
    /// added to the cache. A cache that can't be read counts as a miss.
    pub async fn respond<F: Fetcher>(&self, url: &str, fetcher: &F) -> Result<Vec<u8>> {
        match self.lookup(url) {
            Ok(Some(body)) => {
                debug!("Cache hit: {url}");
                return Ok(body);
            }
            Ok(None) => debug!("Cache miss: {url}"),
            Err(e) => warn!("Could not read cache {} for {url}: {e}", self.version),
        }

        fetcher.fetch(&self.resolve(url)).await
    }

    fn generation_dir(&self) -> PathBuf {
        self.root.join(&self.version)
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
