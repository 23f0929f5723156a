use crate::planner::{DEFAULT_PREFIX, DEFAULT_START_INDEX};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults the command line falls back to when a flag is not given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub prefix: String,
    pub start_index: usize,
    pub recursive_default: bool,
    pub include_hidden_default: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            start_index: DEFAULT_START_INDEX,
            recursive_default: false,
            include_hidden_default: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("org", "serpyco", "serpyco")
        .context("could not determine the configuration directory")?;
    Ok(AppPaths {
        config_path: proj.config_dir().join("config.toml"),
    })
}

/// Loads `explicit` when given, otherwise the per-user file. Only the
/// per-user file may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let paths = app_paths()?;
    if !paths.config_path.exists() {
        log::debug!(
            "no config at {}, using defaults",
            paths.config_path.display()
        );
        return Ok(AppConfig::default());
    }
    read_config(&paths.config_path)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("could not parse config file: {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
