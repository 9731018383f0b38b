//! Productivity tracker MCP server library
//!
//! Tracks goals, the dated "dailys" under them, and active/passive habits,
//! and serves them to an assistant over the Model Context Protocol.
//!
//! # Architecture
//!
//! - **MCP Layer**: `TrackerServerHandler` and `handlers` - one tool per operation
//! - **Domain Layer**: `tracker` module - the `ProductivityData` aggregate and its views
//! - **Persistence Layer**: `storage` module - JSON data directory with optional git sync
//!
//! # Example
//!
//! ```no_run
//! use productivity_mcp::TrackerServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = TrackerServerHandler::new("./productivity", false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod formatting;
mod git_ops;
pub mod handlers;
pub mod logging;
pub mod storage;
pub mod tracker;
pub mod validation;

use anyhow::Result;
use chrono::NaiveDate;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail_public};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ImportLineError, TrackerError};
pub use storage::Storage;
pub use tracker::{Daily, DailyState, Goal, GoalState, Habit, HabitType, ProductivityData};

/// MCP server handler for the productivity tracker
///
/// Owns the aggregate behind a mutex. Every tool runs one operation while
/// holding the lock and saves the whole aggregate after a mutation.
pub struct TrackerServerHandler {
    pub(crate) data: Mutex<ProductivityData>,
    pub(crate) storage: Storage,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) export_dir: PathBuf,
}

impl TrackerServerHandler {
    /// Create a handler over `data_dir` using the system clock
    ///
    /// # Example
    /// ```no_run
    /// # use productivity_mcp::TrackerServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = TrackerServerHandler::new("./productivity", false)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(data_dir: impl AsRef<Path>, sync_git: bool) -> Result<Self> {
        Self::with_clock(data_dir, sync_git, SystemClock)
    }

    /// Create a handler with an explicit clock
    pub fn with_clock(
        data_dir: impl AsRef<Path>,
        sync_git: bool,
        clock: impl Clock,
    ) -> Result<Self> {
        let storage = Storage::new(data_dir.as_ref(), sync_git);
        let data = storage.load()?;
        debug!(
            dir = %storage.data_dir().display(),
            goals = data.goals.len(),
            habits = data.habits.len(),
            "tracker handler ready"
        );
        Ok(Self {
            data: Mutex::new(data),
            export_dir: data_dir.as_ref().to_path_buf(),
            storage,
            clock: Box::new(clock),
        })
    }

    /// Directory used by `export_json` when no directory is given
    pub fn with_export_dir(mut self, export_dir: impl Into<PathBuf>) -> Self {
        self.export_dir = export_dir.into();
        self
    }

    pub(crate) fn lock_data(&self) -> MutexGuard<'_, ProductivityData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save the aggregate, exposing a failure to the client
    pub(crate) fn persist(&self, data: &ProductivityData, message: &str) -> McpResult<()> {
        if let Err(e) = self.storage.save_with_message(data, message) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(())
    }

    /// Read the last ended day
    ///
    /// Takes the data guard so the marker is only read under the same lock
    /// that covers the mutation depending on it.
    pub(crate) fn last_ended_day(
        &self,
        _data: &MutexGuard<'_, ProductivityData>,
    ) -> McpResult<Option<NaiveDate>> {
        match self.storage.last_ended_day() {
            Ok(date) => Ok(date),
            Err(e) => bail_public!(_, "Failed to read last ended day: {}", e),
        }
    }

    pub(crate) fn is_day_ended(
        &self,
        data: &MutexGuard<'_, ProductivityData>,
        today: NaiveDate,
    ) -> McpResult<bool> {
        Ok(self.last_ended_day(data)? == Some(today))
    }

    /// Reject the operation once `today` has been ended
    pub(crate) fn ensure_day_open(
        &self,
        data: &MutexGuard<'_, ProductivityData>,
        today: NaiveDate,
    ) -> McpResult<()> {
        if self.is_day_ended(data, today)? {
            return Err(validation::tracker_error(TrackerError::DayAlreadyEnded(
                today,
            )));
        }
        Ok(())
    }
}

impl Drop for TrackerServerHandler {
    fn drop(&mut self) {
        if let Err(e) = self.storage.shutdown() {
            warn!(error = %e, "shutdown git sync failed");
        }
    }
}

/// Personal productivity tracker: goals broken into dated dailys, plus habits.
///
/// Key concepts:
/// - **Goal**: a multi-day objective (backlog → in-progress → achieved/failed).
///   Achieved and failed goals are read-only.
/// - **Daily**: one dated task under a goal (in-progress → achieved/failed).
///   Creating the first daily starts a backlog goal.
/// - **Habit**: recurring behaviour. Active habits are completed like tasks;
///   passive habits (e.g. "no sugar") are checked off.
/// - **End of day**: fails what is still open today. Run once per day.
///
/// Dates use YYYY-MM-DD, months YYYY-MM. IDs are returned on creation.
#[mcp_server]
impl McpServer for TrackerServerHandler {
    /// **Create goal**: Start tracking a multi-day objective.
    #[tool]
    async fn create_goal(
        &self,
        /// Name of the goal
        name: String,
        /// State: backlog/in-progress/achieved/failed (optional, default backlog)
        state: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_goal(name, state).await
    }

    /// **Update goal**: Rename a goal or change its state. Achieved/failed goals are read-only.
    #[tool]
    async fn update_goal(
        &self,
        /// Goal ID
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// New state: backlog/in-progress/achieved/failed (optional)
        state: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_goal(id, name, state).await
    }

    /// **Show goal**: Goal details with all its dailys.
    #[tool]
    async fn show_goal(
        &self,
        /// Goal ID
        id: String,
    ) -> McpResult<String> {
        self.handle_show_goal(id).await
    }

    /// **Create daily**: Add a dated task under a goal. A backlog goal becomes in-progress.
    #[tool]
    async fn create_daily(
        &self,
        /// ID of the owning goal
        goal_id: String,
        /// Name of the task
        name: String,
        /// Date: YYYY-MM-DD (optional, default today)
        date: Option<String>,
        /// State: in-progress/achieved/failed (optional, default in-progress)
        state: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_daily(goal_id, name, date, state).await
    }

    /// **Update daily**: Edit an open daily. The failure reason is kept only for failed dailys.
    #[tool]
    async fn update_daily(
        &self,
        /// Daily ID
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// New date: YYYY-MM-DD (optional)
        date: Option<String>,
        /// New state: in-progress/achieved/failed (optional)
        state: Option<String>,
        /// Why it failed (optional, only with state failed)
        failure_reason: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_daily(id, name, date, state, failure_reason)
            .await
    }

    /// **Show daily**: Daily details with its goal.
    #[tool]
    async fn show_daily(
        &self,
        /// Daily ID
        id: String,
    ) -> McpResult<String> {
        self.handle_show_daily(id).await
    }

    /// **Create habit**: Track a recurring behaviour.
    #[tool]
    async fn create_habit(
        &self,
        /// Name of the habit
        name: String,
        /// Type: active (done as a task) or passive (checked off) (optional, default active)
        habit_type: Option<String>,
        /// Description (optional)
        description: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_habit(name, habit_type, description)
            .await
    }

    /// **Update habit**: Rename a habit or change its description. The type cannot change.
    #[tool]
    async fn update_habit(
        &self,
        /// Habit ID
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// New description (optional)
        description: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_habit(id, name, description).await
    }

    /// **Activate/deactivate habit**: Inactive habits leave today's lists and never fail.
    #[tool]
    async fn set_habit_active(
        &self,
        /// Habit ID
        id: String,
        /// true to activate, false to deactivate
        active: bool,
    ) -> McpResult<String> {
        self.handle_set_habit_active(id, active).await
    }

    /// **Show habit**: Habit details with completed and failed counts.
    #[tool]
    async fn show_habit(
        &self,
        /// Habit ID
        id: String,
    ) -> McpResult<String> {
        self.handle_show_habit(id).await
    }

    /// **List**: Goals, dailys and habits with their IDs.
    #[tool]
    async fn list(
        &self,
        /// Kind: goals/dailys/habits/all (optional, default all)
        kind: Option<String>,
    ) -> McpResult<String> {
        self.handle_list(kind).await
    }

    /// **Stats**: Home view with counters, completion rate and goals in progress.
    #[tool]
    async fn stats(&self) -> McpResult<String> {
        self.handle_stats().await
    }

    /// **Month view**: Which days each goal and habit was worked on in a month.
    #[tool]
    async fn month_view(
        &self,
        /// Month: YYYY-MM (optional, default current month)
        month: Option<String>,
    ) -> McpResult<String> {
        self.handle_month_view(month).await
    }

    /// **Tracked periods**: Years with records and the months available for a year.
    #[tool]
    async fn tracked_periods(
        &self,
        /// Year: YYYY (optional, default current year)
        year: Option<String>,
    ) -> McpResult<String> {
        self.handle_tracked_periods(year).await
    }

    /// **Today**: Today's dailys and active habits, plus the passive habit checklist.
    #[tool]
    async fn today(&self) -> McpResult<String> {
        self.handle_today().await
    }

    /// **Complete task**: Mark a daily achieved or an active habit done for today.
    #[tool]
    async fn complete_task(
        &self,
        /// Daily or habit ID
        id: String,
    ) -> McpResult<String> {
        self.handle_complete_task(id).await
    }

    /// **Toggle passive habit**: Check or uncheck a passive habit for today.
    #[tool]
    async fn toggle_passive_habit(
        &self,
        /// Habit ID
        id: String,
        /// true to check, false to uncheck
        checked: bool,
    ) -> McpResult<String> {
        self.handle_toggle_passive_habit(id, checked).await
    }

    /// **Help decide**: Pick one of today's open tasks at random.
    #[tool]
    async fn help_decide(&self) -> McpResult<String> {
        self.handle_help_decide().await
    }

    /// **End day**: Without confirm, preview what will fail. With confirm=true, fail
    /// today's open dailys and unmarked active habits. Once per day.
    #[tool]
    async fn end_day(
        &self,
        /// Set true to end the day (optional, default preview only)
        confirm: Option<bool>,
        /// Failure reasons as daily_id=reason (optional)
        failure_reasons: Option<Vec<String>>,
    ) -> McpResult<String> {
        self.handle_end_day(confirm, failure_reasons).await
    }

    /// **Import text**: Back-fill a past day. One item per line:
    /// `D:<task>,<goal>` for an achieved daily, `H:<habit>` for an achieved habit.
    #[tool]
    async fn import_text(
        &self,
        /// Date: YYYY-MM-DD, not in the future and not already tracked
        date: String,
        /// Lines to import
        text: String,
    ) -> McpResult<String> {
        self.handle_import_text(date, text).await
    }

    /// **Export JSON**: Save the whole plan as productivity-plan-YYYY-MM-DD.json.
    #[tool]
    async fn export_json(
        &self,
        /// Target directory (optional, default configured export directory)
        dir: Option<String>,
    ) -> McpResult<String> {
        self.handle_export_json(dir).await
    }

    /// **Import JSON**: Replace the whole plan with an exported file.
    #[tool]
    async fn import_json(
        &self,
        /// Path of the JSON file
        path: String,
    ) -> McpResult<String> {
        self.handle_import_json(path).await
    }
}
