//! Optional TOML configuration
//!
//! ```toml
//! data_dir = "~/productivity"
//! sync_git = true
//! log_level = "debug"
//! export_dir = "~/exports"
//! ```
//!
//! Every setting can also be given on the command line, which wins.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Directory holding `productivityData.json` and `lastEndedDay`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Commit every save when the data directory is under git
    #[serde(default)]
    pub sync_git: bool,
    #[serde(default)]
    pub log_level: Option<String>,
    /// Default target of `export_json`
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl TrackerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay command-line values on top of the file
    pub fn merge(
        mut self,
        data_dir: Option<PathBuf>,
        sync_git: bool,
        log_level: Option<String>,
        export_dir: Option<PathBuf>,
    ) -> Self {
        if data_dir.is_some() {
            self.data_dir = data_dir;
        }
        self.sync_git |= sync_git;
        if log_level.is_some() {
            self.log_level = log_level;
        }
        if export_dir.is_some() {
            self.export_dir = export_dir;
        }
        self
    }
}
