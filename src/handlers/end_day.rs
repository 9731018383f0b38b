//! End of day handler

use crate::TrackerServerHandler;
use crate::formatting;
use crate::tracker::EndOfDayOutcome;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TrackerServerHandler {
    /// Preview the end of today, or end it when `confirm` is set
    ///
    /// `failure_reasons` holds `daily_id=reason` entries for the dailys listed
    /// by the preview.
    pub async fn handle_end_day(
        &self,
        confirm: Option<bool>,
        failure_reasons: Option<Vec<String>>,
    ) -> McpResult<String> {
        let today = self.clock.today();
        let reasons = validation::parse_failure_reasons(&failure_reasons.unwrap_or_default())?;

        // Marker read and write stay under the data lock
        let mut data = self.lock_data();
        let last_ended = self.last_ended_day(&data)?;
        if last_ended == Some(today) {
            return Ok(format!(
                "Day {} has already been ended. Come back tomorrow!",
                today
            ));
        }

        if !confirm.unwrap_or(false) {
            return Ok(formatting::format_end_of_day_plan(
                &data.plan_end_of_day(today),
            ));
        }

        let summary = match data.end_day(today, last_ended, &reasons) {
            EndOfDayOutcome::Ended(summary) => summary,
            EndOfDayOutcome::AlreadyEnded(date) => {
                return Ok(format!(
                    "Day {} has already been ended. Come back tomorrow!",
                    date
                ));
            }
        };

        self.persist(&data, &format!("End day {}", today))?;
        if let Err(e) = self.storage.set_last_ended_day(today) {
            bail_public!(_, "Failed to save: {}", e);
        }
        info!(
            %today,
            achieved = summary.achieved_count,
            failed = summary.failed_count,
            "day ended"
        );
        Ok(formatting::format_end_of_day_summary(&summary))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::handler;
    use crate::validation::extract_id_from_response;

    #[tokio::test]
    async fn test_preview_does_not_end_the_day() {
        let (_dir, handler) = handler();
        let goal_id = extract_id_from_response(
            &handler
                .handle_create_goal("Fitness".to_string(), None)
                .await
                .unwrap(),
        );
        let daily_id = extract_id_from_response(
            &handler
                .handle_create_daily(goal_id, "Run 5k".to_string(), None, None)
                .await
                .unwrap(),
        );

        let preview = handler.handle_end_day(None, None).await.unwrap();
        assert!(preview.contains(&format!("[{}] Run 5k (goal: Fitness)", daily_id)));
        assert!(preview.contains("0 achieved and 1 failed"));

        let detail = handler.handle_show_daily(daily_id).await.unwrap();
        assert!(detail.contains("State: in-progress"));
    }

    #[tokio::test]
    async fn test_end_day_is_idempotent() {
        let (_dir, handler) = handler();
        let goal_id = extract_id_from_response(
            &handler
                .handle_create_goal("Fitness".to_string(), None)
                .await
                .unwrap(),
        );
        let daily_id = extract_id_from_response(
            &handler
                .handle_create_daily(goal_id, "Run 5k".to_string(), None, None)
                .await
                .unwrap(),
        );
        handler
            .handle_create_habit("Stretch".to_string(), None, None)
            .await
            .unwrap();

        let summary = handler
            .handle_end_day(Some(true), Some(vec![format!("{}=Rain", daily_id)]))
            .await
            .unwrap();
        assert!(summary.starts_with("Day 2025-06-10 ended. Achieved: 0, failed: 2"));

        let detail = handler.handle_show_daily(daily_id).await.unwrap();
        assert!(detail.contains("Failure reason: Rain"));

        let again = handler.handle_end_day(Some(true), None).await.unwrap();
        assert!(again.contains("already been ended"));
        assert!(handler.handle_today().await.unwrap().contains("already been ended"));
        assert!(handler.handle_help_decide().await.is_err());
    }
}
