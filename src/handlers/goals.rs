//! Goal handlers

use crate::TrackerServerHandler;
use crate::formatting;
use crate::tracker::GoalState;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TrackerServerHandler {
    pub async fn handle_create_goal(
        &self,
        name: String,
        state: Option<String>,
    ) -> McpResult<String> {
        let state = match state {
            Some(ref s) => validation::parse_goal_state(s)?,
            None => GoalState::Backlog,
        };

        let mut data = self.lock_data();
        let now = self.clock.now();
        let goal = data
            .create_goal(&name, state, now)
            .map_err(validation::tracker_error)?;
        let (id, name) = (goal.id.clone(), goal.name.clone());

        self.persist(&data, &format!("Create goal {}", name))?;
        info!(goal_id = %id, state = %state, "goal created");
        Ok(format!(
            "Goal created with ID: {} (name: {}, state: {})",
            id, name, state
        ))
    }

    pub async fn handle_update_goal(
        &self,
        id: String,
        name: Option<String>,
        state: Option<String>,
    ) -> McpResult<String> {
        if name.is_none() && state.is_none() {
            bail_public!(_, "Nothing to update: provide name and/or state");
        }
        let state = state
            .as_deref()
            .map(validation::parse_goal_state)
            .transpose()?;

        let mut data = self.lock_data();
        let goal = data
            .update_goal(&id, name.as_deref(), state)
            .map_err(validation::tracker_error)?;
        let message = format!("Goal {} updated (name: {}, state: {})", id, goal.name, goal.state);

        self.persist(&data, &format!("Update goal {}", id))?;
        info!(goal_id = %id, "goal updated");
        Ok(message)
    }

    pub async fn handle_show_goal(&self, id: String) -> McpResult<String> {
        let data = self.lock_data();
        match data.find_goal(&id) {
            Some(goal) => Ok(formatting::format_goal_detail(goal)),
            None => bail_public!(_, "Goal not found: '{}' does not exist", id),
        }
    }
}
