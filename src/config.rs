//! Optional per-project settings read from `.dokkit.config.json`.

use log::warn;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Config file name, looked up at the target directory root.
pub const CONFIG_FILE: &str = ".dokkit.config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DokkitConfig {
    /// Where `summary.md` is written. Relative paths resolve against the target directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Loads the config from `directory`.
///
/// A missing file yields the empty config silently; an unreadable or malformed
/// file is reported as a warning and also yields the empty config.
pub fn load_config(directory: &Path) -> DokkitConfig {
    let config_path = directory.join(CONFIG_FILE);

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return DokkitConfig::default(),
        Err(err) => {
            warn!("Error loading config file {}: {err}", config_path.display());
            return DokkitConfig::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|err| {
        warn!("Error loading config file {}: {err}", config_path.display());
        DokkitConfig::default()
    })
}
