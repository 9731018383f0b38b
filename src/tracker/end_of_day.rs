//! Closing a calendar day
//!
//! Ending a day fails every daily of that day that is still in progress and
//! every active habit with no mark for it. The caller keeps the date of the
//! last ended day; passing it back makes a second run on the same date a no-op.

use super::goal::DailyState;
use super::habit::HabitMark;
use super::tracker_data::ProductivityData;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Reason stored on a failed daily when none was given
pub const DEFAULT_FAILURE_REASON: &str = "No reason provided";

/// A daily that will fail when the day ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFailure {
    pub daily_id: String,
    pub daily_name: String,
    pub goal_name: String,
}

/// What ending the day would do, computed without mutating anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfDayPlan {
    pub date: NaiveDate,
    /// In-progress dailys that need a failure reason
    pub failing_dailys: Vec<PendingFailure>,
    /// Names of active habits with no mark for the day
    pub failing_habits: Vec<String>,
    pub achieved_count: usize,
}

impl EndOfDayPlan {
    pub fn failed_count(&self) -> usize {
        self.failing_dailys.len() + self.failing_habits.len()
    }
}

/// Result of ending a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfDaySummary {
    pub date: NaiveDate,
    pub achieved_count: usize,
    pub failed_count: usize,
    pub failed_dailys: Vec<PendingFailure>,
    pub failed_habits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOfDayOutcome {
    /// The day had been ended before; nothing changed
    AlreadyEnded(NaiveDate),
    Ended(EndOfDaySummary),
}

impl ProductivityData {
    /// Preview the end of `today`
    pub fn plan_end_of_day(&self, today: NaiveDate) -> EndOfDayPlan {
        let mut achieved_count = 0;
        let mut failing_dailys = Vec::new();

        for (goal, daily) in self.all_dailys().filter(|(_, d)| d.date == today) {
            match daily.state {
                DailyState::Achieved => achieved_count += 1,
                DailyState::InProgress => failing_dailys.push(PendingFailure {
                    daily_id: daily.id.clone(),
                    daily_name: daily.name.clone(),
                    goal_name: goal.name.clone(),
                }),
                DailyState::Failed => {}
            }
        }

        let mut failing_habits = Vec::new();
        for habit in self.habits.iter().filter(|h| h.active) {
            match habit.mark_on(today) {
                HabitMark::Achieved => achieved_count += 1,
                HabitMark::Unmarked => failing_habits.push(habit.name.clone()),
                HabitMark::Failed => {}
            }
        }

        EndOfDayPlan {
            date: today,
            failing_dailys,
            failing_habits,
            achieved_count,
        }
    }

    /// End `today`
    ///
    /// `reasons` maps daily IDs to failure reasons; blank or missing reasons
    /// become [`DEFAULT_FAILURE_REASON`]. Returns
    /// [`EndOfDayOutcome::AlreadyEnded`] without touching anything when
    /// `last_ended` is `today`.
    pub fn end_day(
        &mut self,
        today: NaiveDate,
        last_ended: Option<NaiveDate>,
        reasons: &HashMap<String, String>,
    ) -> EndOfDayOutcome {
        if last_ended == Some(today) {
            return EndOfDayOutcome::AlreadyEnded(today);
        }

        let plan = self.plan_end_of_day(today);

        for pending in &plan.failing_dailys {
            let reason = reasons
                .get(&pending.daily_id)
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_FAILURE_REASON);
            if let Some(daily) = self.find_daily_mut(&pending.daily_id) {
                daily.state = DailyState::Failed;
                daily.failure_reason = Some(reason.to_string());
            }
        }

        for habit in self.habits.iter_mut().filter(|h| h.active) {
            if !habit.is_marked_on(today) {
                habit.mark_failed(today);
            }
        }

        let failed_count = plan.failed_count();
        EndOfDayOutcome::Ended(EndOfDaySummary {
            date: today,
            achieved_count: plan.achieved_count,
            failed_count,
            failed_dailys: plan.failing_dailys,
            failed_habits: plan.failing_habits,
        })
    }
}
