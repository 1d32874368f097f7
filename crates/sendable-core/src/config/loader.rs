//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::SendableConfiguration;
use crate::error::SendableError;
use crate::result::Result;

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".autosendable.toml", "autosendable.toml", ".autosendable.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let start = start_path
            .canonicalize()
            .map_err(|e| SendableError::io_error(start_path, e))?;
        let mut current = if start.is_file() {
            start.parent().map(Path::to_path_buf).unwrap_or(start)
        } else {
            start
        };

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<SendableConfiguration> {
        SendableConfiguration::load(path)
    }

    /// Load config from an explicit path, or auto-discover one
    ///
    /// An explicit path must exist. Without one, the search starts at
    /// `start_dir` (or the current directory) and falls back to the defaults
    /// when no file is found.
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<(SendableConfiguration, Option<PathBuf>)> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(SendableError::config_error(format!(
                    "Config file not found: {}. Run 'auto-sendable config init' to create one.",
                    path.display()
                )));
            }
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok((SendableConfiguration::default(), None))
            }
        }
    }
}
