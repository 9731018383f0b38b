//! Persistence for the tracker
//!
//! A data directory plays the role of the browser's local storage: one JSON
//! blob with the whole plan and a separate key holding the last ended day.

use crate::git_ops::GitOps;
use crate::tracker::ProductivityData;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File holding the serialized plan
pub const DATA_FILE: &str = "productivityData.json";

/// File holding the last ended day as `YYYY-MM-DD`
pub const LAST_ENDED_DAY_FILE: &str = "lastEndedDay";

pub struct Storage {
    data_dir: PathBuf,
    git_ops: Option<GitOps>,
}

impl Storage {
    /// Create a storage rooted at `data_dir`
    ///
    /// With `sync_git`, every save is committed when the directory lives in a
    /// git repository.
    pub fn new(data_dir: impl AsRef<Path>, sync_git: bool) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let git_ops = sync_git.then(|| GitOps::new(&data_dir));
        Self { data_dir, git_ops }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE)
    }

    pub fn last_ended_day_path(&self) -> PathBuf {
        self.data_dir.join(LAST_ENDED_DAY_FILE)
    }

    /// True once a plan has been saved
    pub fn has_saved_data(&self) -> bool {
        self.data_path().exists()
    }

    /// Load the saved plan, or an empty one if nothing was saved yet
    pub fn load(&self) -> Result<ProductivityData> {
        let path = self.data_path();
        if !path.exists() {
            debug!(path = %path.display(), "no saved plan, starting empty");
            return Ok(ProductivityData::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data = ProductivityData::from_json(&content)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        debug!(
            goals = data.goals.len(),
            habits = data.habits.len(),
            "loaded plan"
        );
        Ok(data)
    }

    /// Save the whole plan
    pub fn save(&self, data: &ProductivityData) -> Result<()> {
        self.save_with_message(data, "Update productivity data")
    }

    /// Save the whole plan, using `message` as commit message when syncing
    pub fn save_with_message(&self, data: &ProductivityData, message: &str) -> Result<()> {
        let content = data.to_json_pretty()?;
        write_atomic(&self.data_path(), content.as_bytes())?;
        debug!(message, "saved plan");
        self.sync(message)
    }

    /// The last day that was ended, if any
    pub fn last_ended_day(&self) -> Result<Option<NaiveDate>> {
        let path = self.last_ended_day_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match NaiveDate::parse_from_str(content.trim(), "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable last ended day marker");
                Ok(None)
            }
        }
    }

    /// Remember `date` as the last ended day
    pub fn set_last_ended_day(&self, date: NaiveDate) -> Result<()> {
        write_atomic(
            &self.last_ended_day_path(),
            date.format("%Y-%m-%d").to_string().as_bytes(),
        )?;
        self.sync(&format!("End day {}", date))
    }

    /// Write the plan as `productivity-plan-<date>.json` into `dir`
    pub fn export_to_dir(
        &self,
        data: &ProductivityData,
        dir: &Path,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(export_file_name(date));
        let content = data.to_json_pretty()?;
        write_atomic(&path, content.as_bytes())?;
        info!(path = %path.display(), "exported plan");
        Ok(path)
    }

    /// Read a plan from an exported JSON file
    ///
    /// Nothing is saved; the caller decides whether to replace the current plan.
    pub fn read_import_file(&self, path: &Path) -> Result<ProductivityData> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ProductivityData::from_json(&content)
            .context("Error loading file. Please check the JSON format.")
    }

    fn sync(&self, message: &str) -> Result<()> {
        if let Some(git_ops) = &self.git_ops {
            let data_path = self.data_path();
            let marker_path = self.last_ended_day_path();
            git_ops.sync(&[data_path.as_path(), marker_path.as_path()], message)?;
        }
        Ok(())
    }

    /// Push outstanding commits on shutdown
    pub fn shutdown(&self) -> Result<()> {
        match &self.git_ops {
            Some(git_ops) if git_ops.is_git_managed() => git_ops.push(),
            _ => Ok(()),
        }
    }
}

/// Name of an exported plan file for `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("productivity-plan-{}.json", date.format("%Y-%m-%d"))
}

/// Write through a temporary file and rename it over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create {}", temp_path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync {}", temp_path.display()))?;
    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::GoalState;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_returns_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        assert!(!storage.has_saved_data());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        let mut data = ProductivityData::new();
        data.create_goal("Learn Rust", GoalState::Backlog, Utc::now())
            .unwrap();

        storage.save(&data).unwrap();
        assert!(storage.has_saved_data());
        assert!(!dir.path().join("productivityData.tmp").exists());
        assert_eq!(storage.load().unwrap(), data);
    }

    #[test]
    fn test_last_ended_day_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        assert_eq!(storage.last_ended_day().unwrap(), None);

        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        storage.set_last_ended_day(date).unwrap();
        assert_eq!(storage.last_ended_day().unwrap(), Some(date));
        assert_eq!(
            fs::read_to_string(storage.last_ended_day_path()).unwrap(),
            "2025-06-10"
        );
    }

    #[test]
    fn test_unreadable_marker_is_ignored() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        fs::write(storage.last_ended_day_path(), "yesterday").unwrap();
        assert_eq!(storage.last_ended_day().unwrap(), None);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        fs::write(storage.data_path(), "{ broken").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(export_file_name(date), "productivity-plan-2025-01-05.json");
    }
}
