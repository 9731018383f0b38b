//! Productivity tracker MCP server - main entry point
//!
//! The actual implementation is in the `productivity_mcp` library.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use productivity_mcp::TrackerServerHandler;
use productivity_mcp::config::TrackerConfig;
use productivity_mcp::logging::init_logging;
use std::path::PathBuf;
use tracing::info;

/// Productivity tracker - goals, dailys and habits via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding productivityData.json and lastEndedDay
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable git synchronization on save
    #[arg(long)]
    sync_git: bool,

    /// Log filter, e.g. "debug" or "productivity_mcp=trace" (default: info or RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Default directory for export_json (default: the data directory)
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    }
    .merge(args.data_dir, args.sync_git, args.log_level, args.export_dir);

    init_logging(config.log_level.as_deref())?;

    let data_dir = config
        .data_dir
        .context("No data directory given on the command line or in the config file")?;
    info!(dir = %data_dir.display(), sync_git = config.sync_git, "starting productivity tracker");

    let mut handler = TrackerServerHandler::new(&data_dir, config.sync_git)?;
    if let Some(export_dir) = config.export_dir {
        handler = handler.with_export_dir(export_dir);
    }
    serve_stdio(handler).await?;
    Ok(())
}
