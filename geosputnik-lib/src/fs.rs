use std::{fs::create_dir_all, path::PathBuf};

use xdg::BaseDirectories;

use crate::{Error, Result};

/// Returns the path to the Geosputnik configuration directory. If it doesn't exist when this
/// function is called, it will be created.
pub fn config_dir() -> Result<PathBuf> {
    let path = xdg_prefix()
        .get_config_home()
        .ok_or(Error::NoHomeDir("config"))?;

    create_dir_all(&path)?;

    Ok(path)
}

/// Returns the path to the Geosputnik data directory, where markers are persisted. If it doesn't
/// exist when this function is called, it will be created.
pub fn data_dir() -> Result<PathBuf> {
    let path = xdg_prefix()
        .get_data_home()
        .ok_or(Error::NoHomeDir("data"))?;

    create_dir_all(&path)?;

    Ok(path)
}

/// Returns the path to the Geosputnik cache directory, the root of all offline cache
/// generations. If it doesn't exist when this function is called, it will be created.
pub fn cache_dir() -> Result<PathBuf> {
    let path = xdg_prefix()
        .get_cache_home()
        .ok_or(Error::NoHomeDir("cache"))?;

    create_dir_all(&path)?;

    Ok(path)
}

fn xdg_prefix() -> BaseDirectories {
    xdg::BaseDirectories::with_prefix("geosputnik")
}
