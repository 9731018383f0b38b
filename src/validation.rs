//! Parameter parsing for the MCP tools
//!
//! Every helper turns a bad parameter into an invalid-params error whose
//! message is shown to the client.

use crate::error::TrackerError;
use crate::tracker::{DailyState, GoalState, HabitType};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;
use std::collections::HashMap;

fn invalid_params(message: impl Into<String>) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Expose a domain rejection to the client
pub fn tracker_error(error: TrackerError) -> mcp_attr::Error {
    invalid_params(error.to_string())
}

/// Parse a date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })
}

/// Parse a month in YYYY-MM format
///
/// The month number itself is checked when the view is built.
pub fn parse_month(month_str: &str) -> McpResult<(i32, u32)> {
    let invalid = || {
        invalid_params(format!(
            "Invalid month format '{}'. Use YYYY-MM (e.g., '2025-03')",
            month_str
        ))
    };
    let (year, month) = month_str.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    Ok((year, month))
}

pub fn parse_goal_state(state: &str) -> McpResult<GoalState> {
    state.parse::<GoalState>().map_err(invalid_params)
}

pub fn parse_daily_state(state: &str) -> McpResult<DailyState> {
    state.parse::<DailyState>().map_err(invalid_params)
}

pub fn parse_habit_type(habit_type: &str) -> McpResult<HabitType> {
    habit_type.parse::<HabitType>().map_err(invalid_params)
}

/// Parse `daily_id=reason` entries into a map
pub fn parse_failure_reasons(entries: &[String]) -> McpResult<HashMap<String, String>> {
    entries
        .iter()
        .map(|entry| {
            let (id, reason) = entry.split_once('=').ok_or_else(|| {
                invalid_params(format!(
                    "Invalid failure reason '{}'. Use daily_id=reason",
                    entry
                ))
            })?;
            Ok((id.trim().to_string(), reason.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
/// Extract the ID from a creation response
///
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
