//! Read-only projections over ProductivityData
//!
//! Home statistics, the "what to do today" lists, the help-decide candidates
//! and the period selectors are recomputed from the aggregate on every call.

use super::goal::{DailyState, Goal, GoalState};
use super::habit::HabitType;
use super::tracker_data::ProductivityData;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Colour band of the completion rate on the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBand {
    /// Below 60%
    Low,
    /// 60% to 80% inclusive
    Medium,
    /// Above 80%
    High,
}

impl CompletionBand {
    pub fn for_rate(rate: u32) -> Self {
        if rate < 60 {
            CompletionBand::Low
        } else if rate <= 80 {
            CompletionBand::Medium
        } else {
            CompletionBand::High
        }
    }
}

/// Summary numbers shown on the home view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerStats {
    /// Goals in backlog or in progress
    pub active_goals: usize,
    pub completed_goals: usize,
    pub habits_count: usize,
    pub daily_count: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Whole percent, 0 when there is nothing to measure
    pub completion_rate: u32,
}

impl TrackerStats {
    pub fn band(&self) -> CompletionBand {
        CompletionBand::for_rate(self.completion_rate)
    }
}

/// Percentage rounded to the nearest whole number, halves rounding up
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// What kind of entry a task in today's list is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodayTaskKind {
    Daily { goal_name: String, state: DailyState },
    Habit,
}

/// One line of today's active task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayTask {
    pub id: String,
    pub name: String,
    pub kind: TodayTaskKind,
    pub completed: bool,
}

/// One checkbox of today's passive habit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveHabitEntry {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

/// Everything the "what to do today" view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayView {
    pub date: NaiveDate,
    pub day_ended: bool,
    pub active_tasks: Vec<TodayTask>,
    pub passive_habits: Vec<PassiveHabitEntry>,
}

/// A task the help-decide picker may choose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideCandidate {
    pub id: String,
    pub name: String,
    pub is_habit: bool,
}

fn by_name(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl ProductivityData {
    /// Compute the home view statistics
    pub fn stats(&self) -> TrackerStats {
        let active_goals = self
            .goals
            .iter()
            .filter(|g| matches!(g.state, GoalState::InProgress | GoalState::Backlog))
            .count();
        let completed_goals = self
            .goals
            .iter()
            .filter(|g| g.state == GoalState::Achieved)
            .count();

        let daily_count = self.all_dailys().count();
        let achieved_dailys = self
            .all_dailys()
            .filter(|(_, d)| d.state == DailyState::Achieved)
            .count();

        let habit_achieved: usize = self.habits.iter().map(|h| h.achieved_count()).sum();
        let habit_failed: usize = self.habits.iter().map(|h| h.failed_count()).sum();

        let total_tasks = daily_count + habit_achieved + habit_failed;
        let completed_tasks = achieved_dailys + habit_achieved;

        TrackerStats {
            active_goals,
            completed_goals,
            habits_count: self.habits.len(),
            daily_count,
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }

    /// Goals currently in progress, for the activity list
    pub fn in_progress_goals(&self) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| g.state == GoalState::InProgress)
            .collect()
    }

    /// Build today's task lists
    ///
    /// When the day has already been ended both lists are empty.
    pub fn today_view(&self, today: NaiveDate, day_ended: bool) -> TodayView {
        if day_ended {
            return TodayView {
                date: today,
                day_ended,
                active_tasks: Vec::new(),
                passive_habits: Vec::new(),
            };
        }

        let mut active_tasks: Vec<TodayTask> = self
            .all_dailys()
            .filter(|(_, d)| d.date == today)
            .map(|(g, d)| TodayTask {
                id: d.id.clone(),
                name: d.name.clone(),
                kind: TodayTaskKind::Daily {
                    goal_name: g.name.clone(),
                    state: d.state,
                },
                completed: d.state == DailyState::Achieved,
            })
            .collect();

        active_tasks.extend(
            self.habits
                .iter()
                .filter(|h| h.active && h.habit_type == HabitType::Active)
                .map(|h| TodayTask {
                    id: h.id.clone(),
                    name: h.name.clone(),
                    kind: TodayTaskKind::Habit,
                    completed: h.achieved_on(today),
                }),
        );
        active_tasks.sort_by(|a, b| by_name(&a.name, &b.name));

        let mut passive_habits: Vec<PassiveHabitEntry> = self
            .habits
            .iter()
            .filter(|h| h.active && h.habit_type == HabitType::Passive)
            .map(|h| PassiveHabitEntry {
                id: h.id.clone(),
                name: h.name.clone(),
                checked: h.achieved_on(today),
            })
            .collect();
        passive_habits.sort_by(|a, b| by_name(&a.name, &b.name));

        TodayView {
            date: today,
            day_ended,
            active_tasks,
            passive_habits,
        }
    }

    /// Tasks still open today: in-progress dailys and unmarked active habits
    pub fn decide_candidates(&self, today: NaiveDate) -> Vec<DecideCandidate> {
        let dailys = self
            .all_dailys()
            .filter(|(_, d)| d.date == today && d.state == DailyState::InProgress)
            .map(|(_, d)| DecideCandidate {
                id: d.id.clone(),
                name: d.name.clone(),
                is_habit: false,
            });

        let habits = self
            .habits
            .iter()
            .filter(|h| h.active && h.habit_type == HabitType::Active && !h.is_marked_on(today))
            .map(|h| DecideCandidate {
                id: h.id.clone(),
                name: h.name.clone(),
                is_habit: true,
            });

        dailys.chain(habits).collect()
    }

    /// Every date that carries a daily or a habit record
    pub fn tracked_dates(&self) -> BTreeSet<NaiveDate> {
        self.all_dailys()
            .map(|(_, d)| d.date)
            .chain(self.habits.iter().flat_map(|h| h.recorded_dates().copied()))
            .collect()
    }

    pub fn earliest_tracked_date(&self) -> Option<NaiveDate> {
        self.tracked_dates().into_iter().next()
    }

    /// True if any daily or habit record exists on `date`
    pub fn has_records_on(&self, date: NaiveDate) -> bool {
        self.goals.iter().any(|g| g.has_daily_on(date))
            || self.habits.iter().any(|h| h.is_marked_on(date))
    }

    /// Years offered by the month view, newest first, always including `today`'s year
    pub fn tracked_years(&self, today: NaiveDate) -> Vec<i32> {
        let mut years: BTreeSet<i32> = self.tracked_dates().iter().map(|d| d.year()).collect();
        years.insert(today.year());
        years.into_iter().rev().collect()
    }

    /// Months offered for `year`: all twelve once the year has any record
    pub fn tracked_months(&self, year: i32) -> Vec<u32> {
        if self.tracked_dates().iter().any(|d| d.year() == year) {
            (1..=12).collect()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(5, 5), 100);
    }

    #[test]
    fn test_completion_band_thresholds() {
        assert_eq!(CompletionBand::for_rate(0), CompletionBand::Low);
        assert_eq!(CompletionBand::for_rate(59), CompletionBand::Low);
        assert_eq!(CompletionBand::for_rate(60), CompletionBand::Medium);
        assert_eq!(CompletionBand::for_rate(80), CompletionBand::Medium);
        assert_eq!(CompletionBand::for_rate(81), CompletionBand::High);
    }

    #[test]
    fn test_by_name_is_case_insensitive() {
        let mut names = vec!["banana", "Apple", "cherry"];
        names.sort_by(|a, b| by_name(a, b));
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }
}
