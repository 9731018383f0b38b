use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a goal
///
/// Serialized in kebab-case (`"in-progress"`) to match exported plan files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalState {
    /// Created but not started yet
    Backlog,
    /// At least one daily has been planned
    InProgress,
    Achieved,
    Failed,
}

impl GoalState {
    /// Achieved and failed goals are closed for editing
    pub fn is_closed(&self) -> bool {
        matches!(self, GoalState::Achieved | GoalState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalState::Backlog => "backlog",
            GoalState::InProgress => "in-progress",
            GoalState::Achieved => "achieved",
            GoalState::Failed => "failed",
        }
    }
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "backlog" => Ok(GoalState::Backlog),
            "in-progress" | "in_progress" => Ok(GoalState::InProgress),
            "achieved" => Ok(GoalState::Achieved),
            "failed" => Ok(GoalState::Failed),
            _ => Err(format!(
                "Invalid goal state '{}'. Valid options are: backlog, in-progress, achieved, failed",
                s
            )),
        }
    }
}

/// Lifecycle of a single daily task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DailyState {
    InProgress,
    Achieved,
    Failed,
}

impl DailyState {
    /// Achieved and failed dailys are closed for editing
    pub fn is_closed(&self) -> bool {
        matches!(self, DailyState::Achieved | DailyState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyState::InProgress => "in-progress",
            DailyState::Achieved => "achieved",
            DailyState::Failed => "failed",
        }
    }
}

impl fmt::Display for DailyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in-progress" | "in_progress" => Ok(DailyState::InProgress),
            "achieved" => Ok(DailyState::Achieved),
            "failed" => Ok(DailyState::Failed),
            _ => Err(format!(
                "Invalid daily state '{}'. Valid options are: in-progress, achieved, failed",
                s
            )),
        }
    }
}

/// One dated task instance under a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Daily {
    pub id: String,
    /// Owning goal
    pub goal_id: String,
    pub name: String,
    pub state: DailyState,
    pub date: NaiveDate,
    /// Only present while the daily is failed
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Daily {
    pub fn is_read_only(&self) -> bool {
        self.state.is_closed()
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

/// A tracked multi-day objective owning its dailys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub state: GoalState,
    #[serde(default)]
    pub dailys: Vec<Daily>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn is_read_only(&self) -> bool {
        self.state.is_closed()
    }

    pub fn has_daily_on(&self, date: NaiveDate) -> bool {
        self.dailys.iter().any(|d| d.date == date)
    }

    pub fn has_activity_in(&self, year: i32, month: u32) -> bool {
        self.dailys.iter().any(|d| d.is_in_month(year, month))
    }

    /// True if the goal was created in the given month or any month before it
    pub fn started_by(&self, year: i32, month: u32) -> bool {
        let created = self.created_at.date_naive();
        (created.year(), created.month()) <= (year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn goal_created_on(y: i32, m: u32, d: u32) -> Goal {
        Goal {
            id: "g1".to_string(),
            name: "Learn Rust".to_string(),
            state: GoalState::Backlog,
            dailys: Vec::new(),
            created_at: Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_goal_state_round_trips_through_str() {
        for state in [
            GoalState::Backlog,
            GoalState::InProgress,
            GoalState::Achieved,
            GoalState::Failed,
        ] {
            assert_eq!(state.as_str().parse::<GoalState>().unwrap(), state);
        }
        assert_eq!("in_progress".parse::<GoalState>(), Ok(GoalState::InProgress));
        assert!("done".parse::<GoalState>().is_err());
    }

    #[test]
    fn test_state_serializes_kebab_case() {
        let json = serde_json::to_string(&DailyState::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let state: GoalState = serde_json::from_str("\"backlog\"").unwrap();
        assert_eq!(state, GoalState::Backlog);
    }

    #[test]
    fn test_closed_states() {
        assert!(!GoalState::Backlog.is_closed());
        assert!(!GoalState::InProgress.is_closed());
        assert!(GoalState::Achieved.is_closed());
        assert!(GoalState::Failed.is_closed());
        assert!(!DailyState::InProgress.is_closed());
        assert!(DailyState::Failed.is_closed());
    }

    #[test]
    fn test_started_by_compares_year_and_month() {
        let goal = goal_created_on(2025, 3, 31);
        assert!(goal.started_by(2025, 3));
        assert!(goal.started_by(2025, 4));
        assert!(goal.started_by(2026, 1));
        assert!(!goal.started_by(2025, 2));
        assert!(!goal.started_by(2024, 12));
    }
}
