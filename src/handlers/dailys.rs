//! Daily handlers

use crate::TrackerServerHandler;
use crate::formatting;
use crate::tracker::DailyState;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TrackerServerHandler {
    /// Add a daily under a goal; the date defaults to today
    pub async fn handle_create_daily(
        &self,
        goal_id: String,
        name: String,
        date: Option<String>,
        state: Option<String>,
    ) -> McpResult<String> {
        let date = match date {
            Some(ref d) => validation::parse_date(d)?,
            None => self.clock.today(),
        };
        let state = match state {
            Some(ref s) => validation::parse_daily_state(s)?,
            None => DailyState::InProgress,
        };

        let mut data = self.lock_data();
        let now = self.clock.now();
        let daily = data
            .create_daily(&goal_id, &name, date, state, now)
            .map_err(validation::tracker_error)?;
        let (id, name) = (daily.id.clone(), daily.name.clone());

        self.persist(&data, &format!("Create daily {}", name))?;
        info!(daily_id = %id, goal_id = %goal_id, %date, "daily created");
        Ok(format!(
            "Daily created with ID: {} (name: {}, date: {}, state: {})",
            id, name, date, state
        ))
    }

    pub async fn handle_update_daily(
        &self,
        id: String,
        name: Option<String>,
        date: Option<String>,
        state: Option<String>,
        failure_reason: Option<String>,
    ) -> McpResult<String> {
        if name.is_none() && date.is_none() && state.is_none() && failure_reason.is_none() {
            bail_public!(
                _,
                "Nothing to update: provide name, date, state and/or failure_reason"
            );
        }
        let date = date.as_deref().map(validation::parse_date).transpose()?;
        let state = state
            .as_deref()
            .map(validation::parse_daily_state)
            .transpose()?;

        let mut data = self.lock_data();
        let daily = data
            .update_daily(
                &id,
                name.as_deref(),
                date,
                state,
                failure_reason.as_deref(),
            )
            .map_err(validation::tracker_error)?;
        let message = format!(
            "Daily {} updated (name: {}, date: {}, state: {})",
            id, daily.name, daily.date, daily.state
        );

        self.persist(&data, &format!("Update daily {}", id))?;
        info!(daily_id = %id, "daily updated");
        Ok(message)
    }

    pub async fn handle_show_daily(&self, id: String) -> McpResult<String> {
        let data = self.lock_data();
        match data.find_daily(&id) {
            Some((goal, daily)) => Ok(formatting::format_daily_detail(goal, daily)),
            None => bail_public!(_, "Daily not found: '{}' does not exist", id),
        }
    }
}
