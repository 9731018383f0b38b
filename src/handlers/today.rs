//! "What to do today": task lists, completion, passive toggles and help-decide

use crate::TrackerServerHandler;
use crate::error::TrackerError;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;
use rand::Rng;

impl TrackerServerHandler {
    pub async fn handle_today(&self) -> McpResult<String> {
        let today = self.clock.today();
        let data = self.lock_data();
        let day_ended = self.is_day_ended(&data, today)?;
        Ok(formatting::format_today(&data.today_view(today, day_ended)))
    }

    /// Complete a daily or an active habit for today
    pub async fn handle_complete_task(&self, id: String) -> McpResult<String> {
        let today = self.clock.today();
        let mut data = self.lock_data();
        self.ensure_day_open(&data, today)?;

        let daily_date = data.find_daily(&id).map(|(_, d)| d.date);
        let (changed, name) = if let Some(date) = daily_date {
            if date != today {
                return Err(validation::tracker_error(TrackerError::DailyNotToday {
                    id,
                    date,
                }));
            }
            let changed = data
                .complete_daily(&id)
                .map_err(validation::tracker_error)?;
            let name = data
                .find_daily(&id)
                .map(|(_, d)| d.name.clone())
                .unwrap_or_default();
            (changed, name)
        } else if data.find_habit(&id).is_some() {
            let changed = data
                .complete_habit(&id, today)
                .map_err(validation::tracker_error)?;
            let name = data
                .find_habit(&id)
                .map(|h| h.name.clone())
                .unwrap_or_default();
            (changed, name)
        } else {
            bail_public!(_, "Task not found: '{}' is neither a daily nor a habit", id);
        };

        if !changed {
            return Ok(format!("'{}' is already completed", name));
        }
        self.persist(&data, &format!("Complete {}", name))?;
        info!(task_id = %id, %today, "task completed");
        Ok(format!("Completed '{}'", name))
    }

    pub async fn handle_toggle_passive_habit(
        &self,
        id: String,
        checked: bool,
    ) -> McpResult<String> {
        let today = self.clock.today();
        let mut data = self.lock_data();
        self.ensure_day_open(&data, today)?;
        let changed = data
            .toggle_passive_habit(&id, today, checked)
            .map_err(validation::tracker_error)?;
        let label = if checked { "checked" } else { "unchecked" };
        if !changed {
            return Ok(format!("Habit {} is already {} for {}", id, label, today));
        }

        self.persist(&data, &format!("Toggle habit {} ({})", id, label))?;
        info!(habit_id = %id, checked, "passive habit toggled");
        Ok(format!("Habit {} {} for {}", id, label, today))
    }

    /// Pick one of today's open tasks at random
    pub async fn handle_help_decide(&self) -> McpResult<String> {
        let today = self.clock.today();
        let data = self.lock_data();
        self.ensure_day_open(&data, today)?;
        let candidates = data.decide_candidates(today);
        let index = match candidates.len() {
            0 => return Err(validation::tracker_error(TrackerError::NothingToDecide)),
            1 => 0,
            n => rand::thread_rng().gen_range(0..n),
        };
        Ok(formatting::format_decision(
            &candidates[index],
            candidates.len(),
        ))
    }
}
