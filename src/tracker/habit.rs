use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How a habit shows up in the daily view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    /// A task to complete, listed with today's tasks
    Active,
    /// A checkbox only
    Passive,
}

impl HabitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Active => "active",
            HabitType::Passive => "passive",
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(HabitType::Active),
            "passive" => Ok(HabitType::Passive),
            _ => Err(format!(
                "Invalid habit type '{}'. Valid options are: active, passive",
                s
            )),
        }
    }
}

/// What happened to a habit on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitMark {
    Achieved,
    Failed,
    Unmarked,
}

/// A recurring behavior tracked by date
///
/// The achieved and failed sets are disjoint. They can only be changed through
/// [`Habit::mark_achieved`], [`Habit::mark_failed`] and
/// [`Habit::clear_achieved`], each of which keeps that property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "super::serde_impl::HabitRecord")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub description: String,
    pub active: bool,
    pub(crate) dates_when_achieved: BTreeSet<NaiveDate>,
    pub(crate) dates_when_failed: BTreeSet<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(
        id: String,
        name: String,
        habit_type: HabitType,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            habit_type,
            description,
            active: true,
            dates_when_achieved: BTreeSet::new(),
            dates_when_failed: BTreeSet::new(),
            created_at,
        }
    }

    pub fn achieved_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates_when_achieved
    }

    pub fn failed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates_when_failed
    }

    pub fn mark_on(&self, date: NaiveDate) -> HabitMark {
        if self.dates_when_achieved.contains(&date) {
            HabitMark::Achieved
        } else if self.dates_when_failed.contains(&date) {
            HabitMark::Failed
        } else {
            HabitMark::Unmarked
        }
    }

    pub fn achieved_on(&self, date: NaiveDate) -> bool {
        self.dates_when_achieved.contains(&date)
    }

    pub fn is_marked_on(&self, date: NaiveDate) -> bool {
        self.mark_on(date) != HabitMark::Unmarked
    }

    /// Record the habit as achieved on `date`, dropping any failure for it
    ///
    /// Returns `true` if the date was not achieved before.
    pub fn mark_achieved(&mut self, date: NaiveDate) -> bool {
        self.dates_when_failed.remove(&date);
        self.dates_when_achieved.insert(date)
    }

    /// Record the habit as failed on `date`, dropping any achievement for it
    ///
    /// Returns `true` if the date was not failed before.
    pub fn mark_failed(&mut self, date: NaiveDate) -> bool {
        self.dates_when_achieved.remove(&date);
        self.dates_when_failed.insert(date)
    }

    /// Undo an achievement; a failure on the same date is left untouched
    pub fn clear_achieved(&mut self, date: NaiveDate) -> bool {
        self.dates_when_achieved.remove(&date)
    }

    pub fn achieved_count(&self) -> usize {
        self.dates_when_achieved.len()
    }

    pub fn failed_count(&self) -> usize {
        self.dates_when_failed.len()
    }

    /// True if the habit has any achieved or failed record in the month
    pub fn has_record_in(&self, year: i32, month: u32) -> bool {
        self.recorded_dates()
            .any(|d| d.year() == year && d.month() == month)
    }

    /// All achieved and failed dates, achieved first
    pub fn recorded_dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates_when_achieved
            .iter()
            .chain(self.dates_when_failed.iter())
    }
}
