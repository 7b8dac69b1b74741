use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Result, fs::config_dir, projection::ProjectionParams, store::DEFAULT_KEY,
    sync::PointStyle,
};

const FILE_NAME: &str = "geosputnik.toml";

/// The core configuration, serialized to TOML.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub projection: ProjectionParams,
    pub markers: MarkerSettings,
    pub style: PointStyle,
    pub share: ShareSettings,
    pub banner: BannerSettings,
    pub offline: OfflineSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Used when the description prompt is dismissed, times out or is left empty
    pub default_description: String,
    pub prompt_timeout_secs: u64,
    /// Storage key holding the whole marker collection
    pub storage_key: String,
    /// Defaults to the XDG data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            default_description: "No description".into(),
            prompt_timeout_secs: 120,
            storage_key: DEFAULT_KEY.into(),
            storage_dir: None,
        }
    }
}

impl MarkerSettings {
    pub fn prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.prompt_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    pub enabled: bool,
    pub title: String,
    pub url: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Geosputnik marker".into(),
            url: "http://localhost/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerSettings {
    pub display_secs: u64,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self { display_secs: 5 }
    }
}

impl BannerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.display_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineSettings {
    /// Name of the current cache generation. Bump it to invalidate every older generation.
    pub cache_version: String,
    /// Defaults to the XDG cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Base for the root-relative entries of the manifest
    pub origin: String,
    pub manifest: Vec<String>,
}

impl Default for OfflineSettings {
    fn default() -> Self {
        Self {
            cache_version: "geosputnik-cache-v1".into(),
            cache_dir: None,
            origin: "http://localhost".into(),
            manifest: [
                "/",
                "/index.html",
                "/app.js",
                "/manifest.json",
                "/favicon.ico",
                "https://js.arcgis.com/4.29/esri/themes/light/main.css",
                "https://js.arcgis.com/4.29/",
                "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css",
                "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js",
            ]
            .map(String::from)
            .into(),
        }
    }
}

impl CoreConfig {
    /// Path of the configuration file in the Geosputnik configuration directory
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    /// Load the configuration from its default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the configuration at `path`. A missing file is created with the defaults, a malformed
    /// one is ignored in favour of the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            match toml::from_str(&contents) {
                Ok(cfg) => Ok(cfg),
                Err(e) => {
                    warn!("Ignoring malformed config {}: {e}", path.display());
                    Ok(Self::default())
                }
            }
        } else {
            debug!("Writing default config to {}", path.display());
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }
}
