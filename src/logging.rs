//! Logging setup
//!
//! The library only emits `tracing` events. Hosts that want them printed call
//! [`init`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{RastraError, Result};

/// Install a global `fmt` subscriber filtered by `config.level`
///
/// The filter comes from the configuration only, never from the environment.
///
/// # Returns
/// `Ok(true)` if the subscriber was installed, `Ok(false)` if a global
/// subscriber was already set.
///
/// # Errors
/// `Config` if the level is not a valid filter directive.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| RastraError::Config {
        reason: format!("invalid log level '{}': {}", config.level, e),
    })?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_ok();
    Ok(installed)
}
