//! Habit handlers

use crate::TrackerServerHandler;
use crate::formatting;
use crate::tracker::HabitType;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TrackerServerHandler {
    pub async fn handle_create_habit(
        &self,
        name: String,
        habit_type: Option<String>,
        description: Option<String>,
    ) -> McpResult<String> {
        let habit_type = match habit_type {
            Some(ref t) => validation::parse_habit_type(t)?,
            None => HabitType::Active,
        };

        let mut data = self.lock_data();
        let now = self.clock.now();
        let habit = data
            .create_habit(&name, habit_type, description.as_deref().unwrap_or(""), now)
            .map_err(validation::tracker_error)?;
        let (id, name) = (habit.id.clone(), habit.name.clone());

        self.persist(&data, &format!("Create habit {}", name))?;
        info!(habit_id = %id, habit_type = %habit_type, "habit created");
        Ok(format!(
            "Habit created with ID: {} (name: {}, type: {})",
            id, name, habit_type
        ))
    }

    pub async fn handle_update_habit(
        &self,
        id: String,
        name: Option<String>,
        description: Option<String>,
    ) -> McpResult<String> {
        if name.is_none() && description.is_none() {
            bail_public!(_, "Nothing to update: provide name and/or description");
        }

        let mut data = self.lock_data();
        let habit = data
            .update_habit(&id, name.as_deref(), description.as_deref())
            .map_err(validation::tracker_error)?;
        let message = format!("Habit {} updated (name: {})", id, habit.name);

        self.persist(&data, &format!("Update habit {}", id))?;
        info!(habit_id = %id, "habit updated");
        Ok(message)
    }

    /// Activate or deactivate a habit
    pub async fn handle_set_habit_active(&self, id: String, active: bool) -> McpResult<String> {
        let mut data = self.lock_data();
        let changed = data
            .set_habit_active(&id, active)
            .map_err(validation::tracker_error)?;
        let label = if active { "active" } else { "inactive" };
        if !changed {
            return Ok(format!("Habit {} is already {}", id, label));
        }

        let verb = if active { "Activate" } else { "Deactivate" };
        self.persist(&data, &format!("{} habit {}", verb, id))?;
        info!(habit_id = %id, active, "habit activity changed");
        Ok(format!("Habit {} is now {}", id, label))
    }

    pub async fn handle_show_habit(&self, id: String) -> McpResult<String> {
        let data = self.lock_data();
        match data.find_habit(&id) {
            Some(habit) => Ok(formatting::format_habit_detail(habit)),
            None => bail_public!(_, "Habit not found: '{}' does not exist", id),
        }
    }
}
