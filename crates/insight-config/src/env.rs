//! Environment overrides.
//!
//! Environment variables take precedence over every config file.

use crate::{Config, ConfigError};

/// Overrides `[service] url`.
pub const ENV_SERVICE_URL: &str = "INSIGHT_SERVICE_URL";

/// Overrides `[service] timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "INSIGHT_TIMEOUT_SECS";

/// Applies environment overrides using `lookup` to read variables.
///
/// Empty values are ignored. A timeout that is not a whole number of seconds is an error.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_SERVICE_URL).filter(|v| !v.trim().is_empty()) {
        config.service.url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
        let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: ENV_TIMEOUT_SECS,
            value: raw.clone(),
        })?;
        config.service.timeout_secs = secs;
    }

    Ok(())
}
