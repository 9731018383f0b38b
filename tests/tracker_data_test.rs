//! Tests of the tracker aggregate through the public library API

mod common;

use chrono::{TimeZone, Utc};
use common::date;
use productivity_mcp::storage::Storage;
use productivity_mcp::tracker::{
    CompletionBand, EndOfDayOutcome, HabitMark, MonthView, completion_rate,
};
use productivity_mcp::{DailyState, GoalState, HabitType, ProductivityData, TrackerError};
use std::collections::HashMap;
use tempfile::TempDir;

fn sample_data() -> ProductivityData {
    let now = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
    let mut data = ProductivityData::new();
    let goal_id = data
        .create_goal("Fitness", GoalState::Backlog, now)
        .unwrap()
        .id
        .clone();
    data.create_daily(&goal_id, "Run", date(2025, 6, 1), DailyState::Achieved, now)
        .unwrap();
    data.create_daily(&goal_id, "Swim", date(2025, 6, 2), DailyState::Failed, now)
        .unwrap();
    let habit_id = data
        .create_habit("Read", HabitType::Passive, "20 pages", now)
        .unwrap()
        .id
        .clone();
    let habit = data.find_habit_mut(&habit_id).unwrap();
    habit.mark_achieved(date(2025, 6, 1));
    habit.mark_failed(date(2025, 6, 2));
    data
}

// Creating the first daily starts a backlog goal
#[test]
fn test_first_daily_moves_goal_in_progress() {
    let data = sample_data();
    assert_eq!(data.goals[0].state, GoalState::InProgress);
}

// A date never sits in both habit sets, whatever the order of marks
#[test]
fn test_habit_sets_stay_disjoint() {
    let mut data = sample_data();
    let id = data.habits[0].id.clone();
    let day = date(2025, 6, 3);

    let habit = data.find_habit_mut(&id).unwrap();
    habit.mark_failed(day);
    habit.mark_achieved(day);
    assert_eq!(habit.mark_on(day), HabitMark::Achieved);
    assert!(!habit.failed_dates().contains(&day));

    habit.clear_achieved(day);
    assert_eq!(habit.mark_on(day), HabitMark::Unmarked);

    for habit in &data.habits {
        assert!(
            habit
                .achieved_dates()
                .intersection(habit.failed_dates())
                .next()
                .is_none()
        );
    }
}

// Stats count dailys plus habit records
#[test]
fn test_stats_over_dailys_and_habit_records() {
    let stats = sample_data().stats();
    assert_eq!(stats.active_goals, 1);
    assert_eq!(stats.completed_goals, 0);
    assert_eq!(stats.daily_count, 2);
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 2);
    assert_eq!(stats.completion_rate, 50);
    assert_eq!(stats.band(), CompletionBand::Low);
}

#[test]
fn test_completion_rate_rounding() {
    assert_eq!(completion_rate(0, 0), 0);
    assert_eq!(completion_rate(1, 8), 13);
    assert_eq!(completion_rate(2, 3), 67);
    assert_eq!(completion_rate(5, 6), 83);
    assert_eq!(CompletionBand::for_rate(80), CompletionBand::Medium);
    assert_eq!(CompletionBand::for_rate(81), CompletionBand::High);
}

// A second end of the same day changes nothing
#[test]
fn test_end_day_is_idempotent_per_day() {
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
    let today = date(2025, 6, 10);
    let mut data = ProductivityData::new();
    let goal_id = data
        .create_goal("Chess", GoalState::InProgress, now)
        .unwrap()
        .id
        .clone();
    let daily_id = data
        .create_daily(&goal_id, "Puzzles", today, DailyState::InProgress, now)
        .unwrap()
        .id
        .clone();

    let outcome = data.end_day(today, Some(date(2025, 6, 9)), &HashMap::new());
    let EndOfDayOutcome::Ended(summary) = outcome else {
        panic!("day should end");
    };
    assert_eq!(summary.failed_count, 1);
    let (_, daily) = data.find_daily(&daily_id).unwrap();
    assert_eq!(daily.state, DailyState::Failed);
    assert_eq!(daily.failure_reason.as_deref(), Some("No reason provided"));

    let snapshot = data.clone();
    assert_eq!(
        data.end_day(today, Some(today), &HashMap::new()),
        EndOfDayOutcome::AlreadyEnded(today)
    );
    assert_eq!(data, snapshot);
}

// Month view lists goals started by the month and habits with records in it
#[test]
fn test_month_view_inclusion() {
    let data = sample_data();

    let june = MonthView::build(&data, 2025, 6).unwrap();
    assert_eq!(june.dates.len(), 30);
    assert_eq!(june.goals[0].marked_days(), 2);
    assert_eq!(june.habits[0].marked_days(), 1);

    let may = MonthView::build(&data, 2025, 5).unwrap();
    assert_eq!(may.goals.len(), 1);
    assert!(may.habits.is_empty());

    let april = MonthView::build(&data, 2025, 4).unwrap();
    assert!(april.goals.is_empty());

    assert_eq!(
        MonthView::build(&data, 2025, 0),
        Err(TrackerError::InvalidMonth {
            year: 2025,
            month: 0
        })
    );
}

// Exporting then importing reproduces the aggregate
#[test]
fn test_export_import_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::new(temp_dir.path(), false);
    let data = sample_data();

    let path = storage
        .export_to_dir(&data, temp_dir.path(), date(2025, 6, 10))
        .unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "productivity-plan-2025-06-10.json"
    );
    assert_eq!(storage.read_import_file(&path).unwrap(), data);
}

// Plans written by the browser version load with defaults filled in
#[test]
fn test_load_browser_export() {
    let json = r#"{
        "version": "1.0",
        "goals": [{
            "id": "g1",
            "name": "Fitness",
            "state": "in-progress",
            "createdAt": "2025-05-01T08:00:00.000Z",
            "dailys": [{
                "id": "d1",
                "goalId": "g1",
                "name": "Run",
                "state": "failed",
                "date": "2025-05-02",
                "failureReason": "Rain",
                "createdAt": "2025-05-02T08:00:00.000Z"
            }]
        }],
        "habits": [{
            "id": "h1",
            "name": "Read",
            "type": "active",
            "datesWhenAchieved": ["2025-05-02"],
            "datesWhenFailed": ["2025-05-02", "2025-05-03"],
            "createdAt": "2025-05-01T08:00:00.000Z"
        }]
    }"#;
    let data = ProductivityData::from_json(json).unwrap();
    assert_eq!(data.goals[0].dailys[0].failure_reason.as_deref(), Some("Rain"));
    let habit = &data.habits[0];
    assert!(habit.active);
    assert_eq!(habit.mark_on(date(2025, 5, 2)), HabitMark::Achieved);
    assert_eq!(habit.failed_count(), 1);
    assert_eq!(data.earliest_tracked_date(), Some(date(2025, 5, 2)));
}
