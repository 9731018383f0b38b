//! Tracker domain models and business logic
//!
//! - `goal`: goals and the dailys they own
//! - `habit`: habits and their achieved/failed date sets
//! - `tracker_data`: the `ProductivityData` aggregate and its CRUD operations
//! - `queries`: home statistics, today's lists and period selectors
//! - `month_view`: monthly goal/habit matrices
//! - `end_of_day`: closing a day
//! - `text_import`: back-filling a day from `D:`/`H:` lines
//! - `serde_impl`: tolerant deserialization and JSON helpers

mod end_of_day;
mod goal;
mod habit;
mod month_view;
mod queries;
mod serde_impl;
mod text_import;
mod tracker_data;

pub use end_of_day::{
    DEFAULT_FAILURE_REASON, EndOfDayOutcome, EndOfDayPlan, EndOfDaySummary, PendingFailure,
};
pub use goal::{Daily, DailyState, Goal, GoalState};
pub use habit::{Habit, HabitMark, HabitType};
pub use month_view::{MonthRow, MonthView, days_in_month};
pub use queries::{
    CompletionBand, DecideCandidate, PassiveHabitEntry, TodayTask, TodayTaskKind, TodayView,
    TrackerStats, completion_rate,
};
pub use text_import::{ImportLine, ImportReport, parse_line};
pub use tracker_data::{FORMAT_VERSION, ProductivityData};
