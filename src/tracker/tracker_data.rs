use super::goal::{Daily, DailyState, Goal, GoalState};
use super::habit::{Habit, HabitType};
use crate::error::TrackerError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format version written into every saved plan
pub const FORMAT_VERSION: &str = "1.0";

/// The aggregate root: every goal (with its dailys) and every habit
///
/// The whole value is persisted after each mutation and loaded wholesale at
/// start-up. Goals and habits keep their insertion order, which is also the
/// order used by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductivityData {
    pub version: String,
    pub goals: Vec<Goal>,
    pub habits: Vec<Habit>,
}

impl Default for ProductivityData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            goals: Vec::new(),
            habits: Vec::new(),
        }
    }
}

fn clean_name(name: &str) -> Result<String, TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::EmptyName);
    }
    Ok(name.to_string())
}

impl ProductivityData {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique record ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.habits.is_empty()
    }

    // --- goals ---

    /// Create a goal and return it
    pub fn create_goal(
        &mut self,
        name: &str,
        state: GoalState,
        now: DateTime<Utc>,
    ) -> Result<&Goal, TrackerError> {
        let goal = Goal {
            id: Self::generate_id(),
            name: clean_name(name)?,
            state,
            dailys: Vec::new(),
            created_at: now,
        };
        self.goals.push(goal);
        Ok(&self.goals[self.goals.len() - 1])
    }

    pub fn find_goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn find_goal_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    /// Find a goal by exact name, ignoring case
    pub fn find_goal_by_name(&self, name: &str) -> Option<&Goal> {
        let name = name.to_lowercase();
        self.goals.iter().find(|g| g.name.to_lowercase() == name)
    }

    /// Rename a goal and/or change its state
    ///
    /// Achieved and failed goals are read-only.
    pub fn update_goal(
        &mut self,
        id: &str,
        name: Option<&str>,
        state: Option<GoalState>,
    ) -> Result<&Goal, TrackerError> {
        let goal = self
            .find_goal_mut(id)
            .ok_or_else(|| TrackerError::GoalNotFound(id.to_string()))?;

        if goal.is_read_only() {
            return Err(TrackerError::GoalReadOnly {
                id: id.to_string(),
                state: goal.state,
            });
        }

        if let Some(name) = name {
            goal.name = clean_name(name)?;
        }
        if let Some(state) = state {
            goal.state = state;
        }
        Ok(goal)
    }

    // --- dailys ---

    /// Add a daily under a goal
    ///
    /// A goal still in the backlog moves to in-progress with its first daily.
    pub fn create_daily(
        &mut self,
        goal_id: &str,
        name: &str,
        date: NaiveDate,
        state: DailyState,
        now: DateTime<Utc>,
    ) -> Result<&Daily, TrackerError> {
        let name = clean_name(name)?;
        let goal = self
            .find_goal_mut(goal_id)
            .ok_or_else(|| TrackerError::GoalNotFound(goal_id.to_string()))?;

        goal.dailys.push(Daily {
            id: Self::generate_id(),
            goal_id: goal.id.clone(),
            name,
            state,
            date,
            failure_reason: None,
            created_at: now,
        });

        if goal.state == GoalState::Backlog {
            goal.state = GoalState::InProgress;
        }

        Ok(&goal.dailys[goal.dailys.len() - 1])
    }

    /// Find a daily together with the goal owning it
    pub fn find_daily(&self, id: &str) -> Option<(&Goal, &Daily)> {
        self.goals
            .iter()
            .find_map(|g| g.dailys.iter().find(|d| d.id == id).map(|d| (g, d)))
    }

    pub fn find_daily_mut(&mut self, id: &str) -> Option<&mut Daily> {
        self.goals
            .iter_mut()
            .flat_map(|g| g.dailys.iter_mut())
            .find(|d| d.id == id)
    }

    /// Every daily across all goals, paired with its goal, in goal order
    pub fn all_dailys(&self) -> impl Iterator<Item = (&Goal, &Daily)> {
        self.goals
            .iter()
            .flat_map(|g| g.dailys.iter().map(move |d| (g, d)))
    }

    /// Edit a daily that is still in progress
    ///
    /// The failure reason only survives when the resulting state is failed;
    /// an empty reason is stored as none.
    pub fn update_daily(
        &mut self,
        id: &str,
        name: Option<&str>,
        date: Option<NaiveDate>,
        state: Option<DailyState>,
        failure_reason: Option<&str>,
    ) -> Result<&Daily, TrackerError> {
        let name = name.map(clean_name).transpose()?;
        let daily = self
            .find_daily_mut(id)
            .ok_or_else(|| TrackerError::DailyNotFound(id.to_string()))?;

        if daily.is_read_only() {
            return Err(TrackerError::DailyReadOnly {
                id: id.to_string(),
                state: daily.state,
            });
        }

        if let Some(name) = name {
            daily.name = name;
        }
        if let Some(date) = date {
            daily.date = date;
        }
        if let Some(state) = state {
            daily.state = state;
        }

        if daily.state == DailyState::Failed {
            if let Some(reason) = failure_reason {
                let reason = reason.trim();
                daily.failure_reason = (!reason.is_empty()).then(|| reason.to_string());
            }
        } else {
            daily.failure_reason = None;
        }

        Ok(daily)
    }

    /// Mark a daily as achieved
    ///
    /// Returns `false` if it was already achieved. Failed dailys stay failed.
    pub fn complete_daily(&mut self, id: &str) -> Result<bool, TrackerError> {
        let daily = self
            .find_daily_mut(id)
            .ok_or_else(|| TrackerError::DailyNotFound(id.to_string()))?;

        match daily.state {
            DailyState::Achieved => Ok(false),
            DailyState::Failed => Err(TrackerError::DailyReadOnly {
                id: id.to_string(),
                state: daily.state,
            }),
            DailyState::InProgress => {
                daily.state = DailyState::Achieved;
                daily.failure_reason = None;
                Ok(true)
            }
        }
    }

    // --- habits ---

    /// Create an active habit with no records
    pub fn create_habit(
        &mut self,
        name: &str,
        habit_type: HabitType,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<&Habit, TrackerError> {
        let habit = Habit::new(
            Self::generate_id(),
            clean_name(name)?,
            habit_type,
            description.trim().to_string(),
            now,
        );
        self.habits.push(habit);
        Ok(&self.habits[self.habits.len() - 1])
    }

    pub fn find_habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn find_habit_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    /// Find a habit by exact name, ignoring case
    pub fn find_habit_by_name(&self, name: &str) -> Option<&Habit> {
        let name = name.to_lowercase();
        self.habits.iter().find(|h| h.name.to_lowercase() == name)
    }

    fn habit_mut(&mut self, id: &str) -> Result<&mut Habit, TrackerError> {
        self.find_habit_mut(id)
            .ok_or_else(|| TrackerError::HabitNotFound(id.to_string()))
    }

    /// Rename a habit and/or change its description; the type is fixed
    pub fn update_habit(
        &mut self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<&Habit, TrackerError> {
        let name = name.map(clean_name).transpose()?;
        let habit = self.habit_mut(id)?;
        if let Some(name) = name {
            habit.name = name;
        }
        if let Some(description) = description {
            habit.description = description.trim().to_string();
        }
        Ok(habit)
    }

    /// Activate or deactivate a habit; returns `false` if nothing changed
    pub fn set_habit_active(&mut self, id: &str, active: bool) -> Result<bool, TrackerError> {
        let habit = self.habit_mut(id)?;
        let changed = habit.active != active;
        habit.active = active;
        Ok(changed)
    }

    /// Record an active habit as done on `date`
    pub fn complete_habit(&mut self, id: &str, date: NaiveDate) -> Result<bool, TrackerError> {
        let habit = self.habit_mut(id)?;
        if !habit.active {
            return Err(TrackerError::HabitInactive(id.to_string()));
        }
        Ok(habit.mark_achieved(date))
    }

    /// Check or uncheck a passive habit for `date`
    pub fn toggle_passive_habit(
        &mut self,
        id: &str,
        date: NaiveDate,
        checked: bool,
    ) -> Result<bool, TrackerError> {
        let habit = self.habit_mut(id)?;
        if habit.habit_type != HabitType::Passive {
            return Err(TrackerError::NotPassive(id.to_string()));
        }
        if !habit.active {
            return Err(TrackerError::HabitInactive(id.to_string()));
        }
        if checked {
            Ok(habit.mark_achieved(date))
        } else {
            Ok(habit.clear_achieved(date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_data_is_empty() {
        let data = ProductivityData::new();
        assert!(data.is_empty());
        assert_eq!(data.version, FORMAT_VERSION);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ProductivityData::generate_id();
        let b = ProductivityData::generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_goal_trims_and_rejects_empty_names() {
        let mut data = ProductivityData::new();
        let goal = data
            .create_goal("  Run a marathon ", GoalState::Backlog, Utc::now())
            .unwrap();
        assert_eq!(goal.name, "Run a marathon");
        assert_eq!(
            data.create_goal("   ", GoalState::Backlog, Utc::now()),
            Err(TrackerError::EmptyName)
        );
        assert_eq!(data.goals.len(), 1);
    }

    #[test]
    fn test_create_daily_for_unknown_goal() {
        let mut data = ProductivityData::new();
        let result = data.create_daily(
            "missing",
            "Stretch",
            date(2025, 1, 1),
            DailyState::InProgress,
            Utc::now(),
        );
        assert_eq!(result, Err(TrackerError::GoalNotFound("missing".to_string())));
    }

    #[test]
    fn test_create_daily_keeps_closed_goal_state() {
        let mut data = ProductivityData::new();
        let goal_id = data
            .create_goal("Ship v1", GoalState::Achieved, Utc::now())
            .unwrap()
            .id
            .clone();
        data.create_daily(
            &goal_id,
            "Retro",
            date(2025, 1, 1),
            DailyState::InProgress,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(data.find_goal(&goal_id).unwrap().state, GoalState::Achieved);
    }

    #[test]
    fn test_update_daily_failure_reason_only_when_failed() {
        let mut data = ProductivityData::new();
        let goal_id = data
            .create_goal("Fitness", GoalState::Backlog, Utc::now())
            .unwrap()
            .id
            .clone();
        let daily_id = data
            .create_daily(
                &goal_id,
                "Run 5k",
                date(2025, 1, 1),
                DailyState::InProgress,
                Utc::now(),
            )
            .unwrap()
            .id
            .clone();

        let daily = data
            .update_daily(&daily_id, None, None, None, Some("rain"))
            .unwrap();
        assert_eq!(daily.failure_reason, None);

        let daily = data
            .update_daily(&daily_id, None, None, Some(DailyState::Failed), Some(" rain "))
            .unwrap();
        assert_eq!(daily.failure_reason.as_deref(), Some("rain"));
        assert!(daily.is_read_only());
    }

    #[test]
    fn test_find_daily_returns_parent_goal() {
        let mut data = ProductivityData::new();
        let goal_id = data
            .create_goal("Fitness", GoalState::Backlog, Utc::now())
            .unwrap()
            .id
            .clone();
        let daily_id = data
            .create_daily(
                &goal_id,
                "Run 5k",
                date(2025, 1, 1),
                DailyState::InProgress,
                Utc::now(),
            )
            .unwrap()
            .id
            .clone();

        let (goal, daily) = data.find_daily(&daily_id).unwrap();
        assert_eq!(goal.id, goal_id);
        assert_eq!(daily.goal_id, goal_id);
        assert!(data.find_daily("nope").is_none());
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let mut data = ProductivityData::new();
        data.create_goal("Learn Rust", GoalState::Backlog, Utc::now())
            .unwrap();
        data.create_habit("Read", HabitType::Active, "", Utc::now())
            .unwrap();
        assert!(data.find_goal_by_name("learn rust").is_some());
        assert!(data.find_goal_by_name("learn").is_none());
        assert!(data.find_habit_by_name("READ").is_some());
    }

    #[test]
    fn test_toggle_requires_passive_habit() {
        let mut data = ProductivityData::new();
        let id = data
            .create_habit("Gym", HabitType::Active, "", Utc::now())
            .unwrap()
            .id
            .clone();
        assert_eq!(
            data.toggle_passive_habit(&id, date(2025, 1, 1), true),
            Err(TrackerError::NotPassive(id.clone()))
        );
    }

    #[test]
    fn test_inactive_habit_cannot_be_completed() {
        let mut data = ProductivityData::new();
        let id = data
            .create_habit("Gym", HabitType::Active, "", Utc::now())
            .unwrap()
            .id
            .clone();
        assert!(data.set_habit_active(&id, false).unwrap());
        assert!(!data.set_habit_active(&id, false).unwrap());
        assert_eq!(
            data.complete_habit(&id, date(2025, 1, 1)),
            Err(TrackerError::HabitInactive(id.clone()))
        );
    }
}
