//! Text rendering of tracker data for tool responses

use crate::tracker::{
    CompletionBand, Daily, DecideCandidate, EndOfDayPlan, EndOfDaySummary, Goal, Habit,
    ImportReport, MonthRow, MonthView, TodayTaskKind, TodayView, TrackerStats,
};
use chrono::NaiveDate;

fn habit_type_label(habit: &Habit) -> String {
    if habit.active {
        habit.habit_type.to_string()
    } else {
        format!("{} (inactive)", habit.habit_type)
    }
}

/// List goals with their state and daily count
pub fn format_goals(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet".to_string();
    }

    let mut result = format!("Found {} goal(s):\n\n", goals.len());
    for goal in goals {
        result.push_str(&format!(
            "- [{}] {} (state: {}, dailys: {})\n",
            goal.id,
            goal.name,
            goal.state,
            goal.dailys.len()
        ));
    }
    result
}

pub fn format_goal_detail(goal: &Goal) -> String {
    let mut result = format!(
        "Goal [{}] {}\n  State: {}\n  Created: {}\n",
        goal.id, goal.name, goal.state, goal.created_at
    );
    if goal.is_read_only() {
        result.push_str("  Read-only: yes\n");
    }

    if goal.dailys.is_empty() {
        result.push_str("  No dailys yet\n");
    } else {
        result.push_str(&format!("  Dailys ({}):\n", goal.dailys.len()));
        for daily in &goal.dailys {
            result.push_str(&format!(
                "  - [{}] {} on {} ({})\n",
                daily.id, daily.name, daily.date, daily.state
            ));
        }
    }
    result
}

/// List dailys with their date and goal, newest first
pub fn format_dailys<'a>(dailys: impl IntoIterator<Item = (&'a Goal, &'a Daily)>) -> String {
    let mut dailys: Vec<_> = dailys.into_iter().collect();
    if dailys.is_empty() {
        return "No dailys yet".to_string();
    }
    dailys.sort_by(|(_, a), (_, b)| b.date.cmp(&a.date));

    let mut result = format!("Found {} daily(s):\n\n", dailys.len());
    for (goal, daily) in dailys {
        result.push_str(&format!(
            "- [{}] {} on {} (state: {}, goal: {})\n",
            daily.id, daily.name, daily.date, daily.state, goal.name
        ));
    }
    result
}

pub fn format_daily_detail(goal: &Goal, daily: &Daily) -> String {
    let mut result = format!(
        "Daily [{}] {}\n  Goal: {} [{}]\n  Date: {}\n  State: {}\n",
        daily.id, daily.name, goal.name, goal.id, daily.date, daily.state
    );
    if let Some(reason) = &daily.failure_reason {
        result.push_str(&format!("  Failure reason: {}\n", reason));
    }
    if daily.is_read_only() {
        result.push_str("  Read-only: yes\n");
    }
    result.push_str(&format!("  Created: {}\n", daily.created_at));
    result
}

pub fn format_habits(habits: &[Habit]) -> String {
    if habits.is_empty() {
        return "No habits yet".to_string();
    }

    let mut result = format!("Found {} habit(s):\n\n", habits.len());
    for habit in habits {
        result.push_str(&format!(
            "- [{}] {} (type: {})\n",
            habit.id,
            habit.name,
            habit_type_label(habit)
        ));
    }
    result
}

pub fn format_habit_detail(habit: &Habit) -> String {
    let mut result = format!(
        "Habit [{}] {}\n  Type: {}\n",
        habit.id,
        habit.name,
        habit_type_label(habit)
    );
    if !habit.description.is_empty() {
        result.push_str(&format!("  Description: {}\n", habit.description));
    }
    result.push_str(&format!(
        "  Completed: {} time(s)\n  Failed: {} time(s)\n  Created: {}\n",
        habit.achieved_count(),
        habit.failed_count(),
        habit.created_at
    ));
    result
}

/// Home view: counters, completion rate and goals in progress
pub fn format_stats(stats: &TrackerStats, in_progress: &[&Goal]) -> String {
    let band = match stats.band() {
        CompletionBand::Low => "low",
        CompletionBand::Medium => "medium",
        CompletionBand::High => "high",
    };

    let mut result = format!(
        "Active goals: {}\nCompleted goals: {}\nHabits: {}\nDailys: {}\n\
         Completion rate: {}% ({}; {}/{} task(s))\n",
        stats.active_goals,
        stats.completed_goals,
        stats.habits_count,
        stats.daily_count,
        stats.completion_rate,
        band,
        stats.completed_tasks,
        stats.total_tasks
    );

    if in_progress.is_empty() {
        result.push_str("\nNo goals in progress\n");
    } else {
        result.push_str("\nIn progress:\n");
        for goal in in_progress {
            result.push_str(&format!(
                "- {} ({} daily(s))\n",
                goal.name,
                goal.dailys.len()
            ));
        }
    }
    result
}

fn format_month_row(row: &MonthRow) -> String {
    let strip: String = row
        .marks
        .iter()
        .map(|marked| if *marked { 'x' } else { '.' })
        .collect();
    format!("  {} | {} ({} day(s))\n", strip, row.name, row.marked_days())
}

/// Month tables as one character per day: `x` marked, `.` not
pub fn format_month_view(view: &MonthView) -> String {
    let mut result = format!(
        "{}-{:02} ({} days)\n",
        view.year,
        view.month,
        view.dates.len()
    );

    result.push_str("\nGoals:\n");
    if view.goals.is_empty() {
        result.push_str("  none\n");
    }
    for row in &view.goals {
        result.push_str(&format_month_row(row));
    }

    result.push_str("\nHabits:\n");
    if view.habits.is_empty() {
        result.push_str("  none\n");
    }
    for row in &view.habits {
        result.push_str(&format_month_row(row));
    }
    result
}

pub fn format_tracked_periods(years: &[i32], year: i32, months: &[u32]) -> String {
    let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let months: Vec<String> = months.iter().map(|m| format!("{:02}", m)).collect();
    format!(
        "Years: {}\nMonths in {}: {}",
        years.join(", "),
        year,
        if months.is_empty() {
            "none".to_string()
        } else {
            months.join(", ")
        }
    )
}

pub fn format_today(view: &TodayView) -> String {
    if view.day_ended {
        return format!(
            "Day {} has already been ended. Come back tomorrow!",
            view.date
        );
    }

    let mut result = format!("Today ({})\n\nTasks:\n", view.date);
    if view.active_tasks.is_empty() {
        result.push_str("  No tasks for today\n");
    }
    for task in &view.active_tasks {
        let check = if task.completed { "[x]" } else { "[ ]" };
        match &task.kind {
            TodayTaskKind::Daily { goal_name, state } => result.push_str(&format!(
                "  {} {} (daily, goal: {}, state: {}) id: {}\n",
                check, task.name, goal_name, state, task.id
            )),
            TodayTaskKind::Habit => result.push_str(&format!(
                "  {} {} (habit) id: {}\n",
                check, task.name, task.id
            )),
        }
    }

    result.push_str("\nPassive habits:\n");
    if view.passive_habits.is_empty() {
        result.push_str("  No passive habits\n");
    }
    for habit in &view.passive_habits {
        let check = if habit.checked { "[x]" } else { "[ ]" };
        result.push_str(&format!("  {} {} id: {}\n", check, habit.name, habit.id));
    }
    result
}

/// Confirmation step of ending the day
pub fn format_end_of_day_plan(plan: &EndOfDayPlan) -> String {
    let mut result = format!(
        "Ending {} will record {} achieved and {} failed task(s).\n",
        plan.date,
        plan.achieved_count,
        plan.failed_count()
    );

    if !plan.failing_dailys.is_empty() {
        result.push_str("\nDailys that will fail (give reasons as daily_id=reason):\n");
        for pending in &plan.failing_dailys {
            result.push_str(&format!(
                "- [{}] {} (goal: {})\n",
                pending.daily_id, pending.daily_name, pending.goal_name
            ));
        }
    }
    if !plan.failing_habits.is_empty() {
        result.push_str("\nHabits that will fail:\n");
        for name in &plan.failing_habits {
            result.push_str(&format!("- {}\n", name));
        }
    }
    result.push_str("\nCall end_day again with confirm=true to end the day.");
    result
}

pub fn format_end_of_day_summary(summary: &EndOfDaySummary) -> String {
    let mut result = format!(
        "Day {} ended. Achieved: {}, failed: {}\n",
        summary.date, summary.achieved_count, summary.failed_count
    );
    for pending in &summary.failed_dailys {
        result.push_str(&format!(
            "- Daily failed: {} (goal: {})\n",
            pending.daily_name, pending.goal_name
        ));
    }
    for name in &summary.failed_habits {
        result.push_str(&format!("- Habit failed: {}\n", name));
    }
    result
}

pub fn format_import_report(date: NaiveDate, report: &ImportReport) -> String {
    let mut result = format!("Imported {} item(s) for {}", report.imported, date);
    if report.has_errors() {
        result.push_str(&format!("\nErrors: {}", report.error_message()));
    }
    result
}

pub fn format_decision(candidate: &DecideCandidate, out_of: usize) -> String {
    let kind = if candidate.is_habit { "habit" } else { "daily" };
    format!(
        "Do this now: {} ({}, id: {}), picked from {} open task(s)",
        candidate.name, kind, candidate.id, out_of
    )
}
