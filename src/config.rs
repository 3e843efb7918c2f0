//! Optional user configuration, read from `<config dir>/nfotags/config.toml`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "nfotags";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the `mkvpropedit` executable.
    pub mkvpropedit: Option<PathBuf>,
    /// Seconds to wait for `mkvpropedit` before giving up.
    pub timeout_secs: Option<u64>,
    /// One of `info`, `debug`, `error`, `none`, `full`.
    pub verbosity: Option<String>,
}

impl Config {
    /// Location of the config file, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the config file, or the defaults if there is none.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads `path`; a missing or empty file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() || fs::metadata(path)?.len() == 0 {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        match Self::from_toml(&content) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                log::error!("Malformed config file {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
