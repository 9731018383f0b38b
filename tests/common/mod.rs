//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use productivity_mcp::{FixedClock, TrackerServerHandler};
use std::path::Path;
use tempfile::TempDir;

/// Day the fixed test clock is set to
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create a test handler over a temporary data directory
pub fn get_test_handler() -> (TrackerServerHandler, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let handler = handler_at(temp_dir.path(), test_today());
    (handler, temp_dir)
}

/// Open a handler over an existing directory with the clock set to `today`
pub fn handler_at(dir: &Path, today: NaiveDate) -> TrackerServerHandler {
    TrackerServerHandler::with_clock(dir, false, FixedClock::at_date(today)).unwrap()
}

/// Extract the ID from a creation response
/// Response format: "Goal created with ID: <id> (name: ...)"
pub fn extract_id_from_response(response: &str) -> String {
    if let Some(start) = response.find("ID: ") {
        let id_part = &response[start + 4..];
        if let Some(end) = id_part.find(" (") {
            return id_part[..end].trim().to_string();
        }
    }
    response
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_end_matches(')')
        .to_string()
}

pub async fn create_goal(handler: &TrackerServerHandler, name: &str) -> String {
    extract_id_from_response(
        &handler
            .handle_create_goal(name.to_string(), None)
            .await
            .unwrap(),
    )
}

pub async fn create_daily(handler: &TrackerServerHandler, goal_id: &str, name: &str) -> String {
    extract_id_from_response(
        &handler
            .handle_create_daily(goal_id.to_string(), name.to_string(), None, None)
            .await
            .unwrap(),
    )
}

pub async fn create_habit(handler: &TrackerServerHandler, name: &str, habit_type: &str) -> String {
    extract_id_from_response(
        &handler
            .handle_create_habit(name.to_string(), Some(habit_type.to_string()), None)
            .await
            .unwrap(),
    )
}
