//! Moving data in and out: text import, JSON export and JSON import

use crate::TrackerServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use std::path::PathBuf;
use tracing::{info, warn};

impl TrackerServerHandler {
    /// Back-fill a past day from `D:`/`H:` lines
    pub async fn handle_import_text(&self, date: String, text: String) -> McpResult<String> {
        let date = validation::parse_date(&date)?;
        let today = self.clock.today();
        let now = self.clock.now();

        let mut data = self.lock_data();
        let report = data
            .import_text(date, &text, today, now)
            .map_err(validation::tracker_error)?;

        if report.imported > 0 {
            self.persist(&data, &format!("Import data for {}", date))?;
        }
        if report.has_errors() {
            warn!(%date, errors = report.errors.len(), "text import had rejected lines");
        }
        info!(%date, imported = report.imported, "text imported");
        Ok(formatting::format_import_report(date, &report))
    }

    /// Write the whole plan to `dir`, or the configured export directory
    pub async fn handle_export_json(&self, dir: Option<String>) -> McpResult<String> {
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| self.export_dir.clone());
        let today = self.clock.today();

        let data = self.lock_data();
        match self.storage.export_to_dir(&data, &dir, today) {
            Ok(path) => Ok(format!("Exported plan to {}", path.display())),
            Err(e) => bail_public!(_, "Failed to export: {:#}", e),
        }
    }

    /// Replace the whole plan with the contents of a JSON export
    pub async fn handle_import_json(&self, path: String) -> McpResult<String> {
        let imported = match self.storage.read_import_file(&PathBuf::from(&path)) {
            Ok(imported) => imported,
            Err(e) => bail_public!(_, "{:#}", e),
        };

        let mut data = self.lock_data();
        *data = imported;
        self.persist(&data, &format!("Import plan from {}", path))?;
        info!(
            goals = data.goals.len(),
            habits = data.habits.len(),
            "plan imported"
        );
        Ok(format!(
            "Imported {} goal(s) and {} habit(s) from {}",
            data.goals.len(),
            data.habits.len(),
            path
        ))
    }
}
