//! Serialization helpers for the tracker aggregate
//!
//! Plans exported by older versions may lack optional fields or carry a date
//! in both habit sets. Habits are read through [`HabitRecord`], which fills
//! defaults and restores the disjoint-sets property before a [`Habit`] exists.

use super::habit::{Habit, HabitType};
use super::tracker_data::ProductivityData;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;

fn default_true() -> bool {
    true
}

fn default_habit_type() -> HabitType {
    HabitType::Active
}

/// Wire shape of a habit as found in stored or imported JSON
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    id: String,
    name: String,
    #[serde(rename = "type", default = "default_habit_type")]
    habit_type: HabitType,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    dates_when_achieved: Option<BTreeSet<NaiveDate>>,
    #[serde(default)]
    dates_when_failed: Option<BTreeSet<NaiveDate>>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl From<HabitRecord> for Habit {
    fn from(record: HabitRecord) -> Self {
        let dates_when_achieved = record.dates_when_achieved.unwrap_or_default();
        // achieved wins over failed for a date found in both sets
        let dates_when_failed = record
            .dates_when_failed
            .unwrap_or_default()
            .difference(&dates_when_achieved)
            .copied()
            .collect();

        Habit {
            id: record.id,
            name: record.name,
            habit_type: record.habit_type,
            description: record.description.unwrap_or_default(),
            active: record.active,
            dates_when_achieved,
            dates_when_failed,
            created_at: record.created_at,
        }
    }
}

impl ProductivityData {
    /// Serialize the whole aggregate as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize productivity data")
    }

    /// Parse a whole aggregate from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid productivity plan JSON")
    }
}
