//! Read-only views: listings, home statistics and month tables

use crate::TrackerServerHandler;
use crate::formatting;
use crate::tracker::MonthView;
use crate::validation;
use chrono::Datelike;
use mcp_attr::{Result as McpResult, bail_public};

impl TrackerServerHandler {
    /// List goals, dailys and/or habits
    pub async fn handle_list(&self, kind: Option<String>) -> McpResult<String> {
        let data = self.lock_data();
        let goals = || formatting::format_goals(&data.goals);
        let dailys = || formatting::format_dailys(data.all_dailys());
        let habits = || formatting::format_habits(&data.habits);

        match kind.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(format!(
                "Goals\n{}\n\nDailys\n{}\n\nHabits\n{}",
                goals(),
                dailys(),
                habits()
            )),
            Some("goals") => Ok(goals()),
            Some("dailys") => Ok(dailys()),
            Some("habits") => Ok(habits()),
            Some(other) => bail_public!(
                _,
                "Invalid kind '{}'. Valid options are: goals, dailys, habits, all",
                other
            ),
        }
    }

    pub async fn handle_stats(&self) -> McpResult<String> {
        let data = self.lock_data();
        Ok(formatting::format_stats(
            &data.stats(),
            &data.in_progress_goals(),
        ))
    }

    /// Month tables for `month` (YYYY-MM), the current month by default
    pub async fn handle_month_view(&self, month: Option<String>) -> McpResult<String> {
        let (year, month) = match month {
            Some(ref m) => validation::parse_month(m)?,
            None => {
                let today = self.clock.today();
                (today.year(), today.month())
            }
        };

        let data = self.lock_data();
        let view = MonthView::build(&data, year, month).map_err(validation::tracker_error)?;
        Ok(formatting::format_month_view(&view))
    }

    /// Years with records and the months offered for `year`
    pub async fn handle_tracked_periods(&self, year: Option<String>) -> McpResult<String> {
        let today = self.clock.today();
        let year = match year {
            Some(ref y) => match y.trim().parse::<i32>() {
                Ok(y) => y,
                Err(_) => bail_public!(_, "Invalid year '{}'. Use YYYY (e.g., '2025')", y),
            },
            None => today.year(),
        };

        let data = self.lock_data();
        Ok(formatting::format_tracked_periods(
            &data.tracked_years(today),
            year,
            &data.tracked_months(year),
        ))
    }
}
