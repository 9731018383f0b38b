#[cfg(test)]
use std::sync::LazyLock;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
#[cfg(test)]
use tracing_subscriber::filter::LevelFilter;

/// Level used when neither the command line, the config file nor `RUST_LOG`
/// says otherwise
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Install the global subscriber
///
/// Events go to stderr: stdout carries the MCP protocol. An explicit `level`
/// wins over `RUST_LOG`.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(())
}

/// Subscriber for tests, installed once on first use
#[cfg(test)]
pub(crate) static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(EnvFilter::try_new("productivity_mcp=loud").is_err());
    }

    #[test]
    fn test_test_logging_can_be_forced_twice() {
        LazyLock::force(&TEST_LOGGING);
        LazyLock::force(&TEST_LOGGING);
        tracing::debug!("test logging initialized");
    }
}
