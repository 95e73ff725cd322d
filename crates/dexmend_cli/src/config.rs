//! Loading of `dexmend.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default configuration file name, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "dexmend.toml";

/// Errors that can occur when loading a `dexmend.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Contents of a `dexmend.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheSection,
}

/// The `[cache]` configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSection {
    /// Cache directory swept when none is given on the command line.
    pub dir: Option<PathBuf>,

    /// Extension of candidate archive files (without the leading dot).
    pub archive_suffix: Option<String>,
}

/// Loads configuration for the current invocation.
///
/// An explicit path (from `--config`) must exist and parse. Without one,
/// `dexmend.toml` in the working directory is used when present, and
/// defaults otherwise.
pub fn load(explicit: Option<&str>) -> Result<CliConfig, ConfigError> {
    match explicit {
        Some(path) => load_from_path(Path::new(path)),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                load_from_path(default)
            } else {
                Ok(CliConfig::default())
            }
        }
    }
}

/// Loads and parses a configuration file at `path`.
pub fn load_from_path(path: &Path) -> Result<CliConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

/// Parses a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_from_str(content: &str) -> Result<CliConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}
