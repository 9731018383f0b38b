//! Back-filling a past day from plain text
//!
//! Each non-blank line is either `D:<task>,<goal>` (an achieved daily under an
//! existing goal) or `H:<habit>` (an achievement of an existing habit). Goal
//! and habit names match case-insensitively. Bad lines are reported and
//! skipped; the good ones are still applied.

use super::goal::DailyState;
use super::tracker_data::ProductivityData;
use crate::error::{ImportLineError, TrackerError};
use chrono::{DateTime, NaiveDate, Utc};

/// A parsed import line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportLine {
    Daily { task: String, goal: String },
    Habit { name: String },
}

/// Parse one trimmed, non-blank line
pub fn parse_line(line: &str) -> Result<ImportLine, ImportLineError> {
    if let Some(rest) = line.strip_prefix("D:") {
        let parts: Vec<&str> = rest.split(',').collect();
        if parts.len() != 2 {
            return Err(ImportLineError::InvalidFormat(line.to_string()));
        }
        Ok(ImportLine::Daily {
            task: parts[0].trim().to_string(),
            goal: parts[1].trim().to_string(),
        })
    } else if let Some(rest) = line.strip_prefix("H:") {
        Ok(ImportLine::Habit {
            name: rest.trim().to_string(),
        })
    } else {
        Err(ImportLineError::MissingPrefix(line.to_string()))
    }
}

/// Outcome of a text import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportLineError>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All line errors joined into one message
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl ProductivityData {
    /// Check that `date` can receive imported data
    ///
    /// The date must not be after `today`, not before the earliest tracked
    /// date, and must not carry any record yet.
    pub fn validate_import_date(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), TrackerError> {
        if date > today {
            return Err(TrackerError::FutureDate);
        }
        if self.earliest_tracked_date().is_some_and(|earliest| date < earliest) {
            return Err(TrackerError::BeforeEarliestData);
        }
        if self.has_records_on(date) {
            return Err(TrackerError::DateAlreadyTracked);
        }
        Ok(())
    }

    /// Import `text` as achievements on `date`
    ///
    /// Fails as a whole only when the date is rejected or the text is blank.
    pub fn import_text(
        &mut self,
        date: NaiveDate,
        text: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, TrackerError> {
        if text.trim().is_empty() {
            return Err(TrackerError::EmptyImport);
        }
        self.validate_import_date(date, today)?;

        let mut report = ImportReport::default();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.apply_import_line(line, date, now) {
                Ok(true) => report.imported += 1,
                Ok(false) => {}
                Err(e) => report.errors.push(e),
            }
        }
        Ok(report)
    }

    /// Apply one line; `Ok(false)` means it was valid but changed nothing
    fn apply_import_line(
        &mut self,
        line: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool, ImportLineError> {
        match parse_line(line)? {
            ImportLine::Daily { task, goal } => {
                let goal_id = self
                    .find_goal_by_name(&goal)
                    .map(|g| g.id.clone())
                    .ok_or(ImportLineError::GoalNotFound(goal))?;
                self.create_daily(&goal_id, &task, date, DailyState::Achieved, now)
                    .map_err(|_| ImportLineError::InvalidFormat(line.to_string()))?;
                Ok(true)
            }
            ImportLine::Habit { name } => {
                let habit_id = self
                    .find_habit_by_name(&name)
                    .map(|h| h.id.clone())
                    .ok_or(ImportLineError::HabitNotFound(name))?;
                Ok(self
                    .find_habit_mut(&habit_id)
                    .is_some_and(|h| h.mark_achieved(date)))
            }
        }
    }
}
