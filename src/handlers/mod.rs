//! MCP tool handlers for the tracker server
//!
//! Each `#[tool]` on `TrackerServerHandler` delegates to a `handle_*` method
//! in one of these files.

pub mod dailys;
pub mod end_day;
pub mod goals;
pub mod habits;
pub mod overview;
pub mod today;
pub mod transfer;
