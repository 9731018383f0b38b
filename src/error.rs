//! Domain errors for tracker operations
//!
//! Infrastructure failures (file I/O, JSON, git) stay in `anyhow`; these are the
//! rejections a user can trigger through the tools and act upon.

use crate::tracker::{DailyState, GoalState};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Goal not found: '{0}' does not exist")]
    GoalNotFound(String),

    #[error("Daily not found: '{0}' does not exist")]
    DailyNotFound(String),

    #[error("Habit not found: '{0}' does not exist")]
    HabitNotFound(String),

    #[error("Goal '{id}' is {state} and can no longer be edited")]
    GoalReadOnly { id: String, state: GoalState },

    #[error("Daily '{id}' is {state} and can no longer be edited")]
    DailyReadOnly { id: String, state: DailyState },

    #[error("Daily '{id}' is planned for {date}. Only today's dailys can be completed")]
    DailyNotToday { id: String, date: NaiveDate },

    #[error("Habit '{0}' is inactive. Activate it first.")]
    HabitInactive(String),

    #[error("Habit '{0}' is not a passive habit")]
    NotPassive(String),

    #[error("Invalid month {year}-{month:02}. Month must be between 01 and 12")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Day {0} has already been ended. Come back tomorrow!")]
    DayAlreadyEnded(NaiveDate),

    #[error("No tasks available to choose from!")]
    NothingToDecide,

    #[error("Date cannot be in the future")]
    FutureDate,

    #[error("Date is before your earliest tracked data")]
    BeforeEarliestData,

    #[error(
        "This date already has tracked data. Cannot add more data to an already completed day."
    )]
    DateAlreadyTracked,

    #[error("Please provide a date and data")]
    EmptyImport,
}

/// A single rejected line of a text import
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportLineError {
    #[error("Invalid format: \"{0}\"")]
    InvalidFormat(String),

    #[error("Invalid format: \"{0}\". Use D: or H: prefix")]
    MissingPrefix(String),

    #[error("Goal not found: \"{0}\"")]
    GoalNotFound(String),

    #[error("Habit not found: \"{0}\"")]
    HabitNotFound(String),
}
