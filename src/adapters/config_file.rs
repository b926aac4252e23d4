//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] on top of a single JSON document on disk.
//! A missing file loads as defaults; `save` validates first and writes
//! the whole document pretty-printed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::SessionConfig;
use crate::error::ConfigError;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SessionConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Config file {} not found, using defaults",
                    self.path.display()
                );
                return Ok(SessionConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = SessionConfig::from_json_str(&text)?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SessionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, text)?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
