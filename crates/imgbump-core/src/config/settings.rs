//! Environment overrides for runtime settings

use crate::error::{Error, Result};
use crate::types::RuntimeSettings;
use std::env;

/// Overrides `http_timeout_secs`
pub const ENV_HTTP_TIMEOUT_SECS: &str = "IMGBUMP_HTTP_TIMEOUT_SECS";

/// Overrides `max_pages`
pub const ENV_MAX_PAGES: &str = "IMGBUMP_MAX_PAGES";

impl RuntimeSettings {
    /// Apply `IMGBUMP_*` environment variable overrides
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(val) = env::var(ENV_HTTP_TIMEOUT_SECS) {
            self.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", ENV_HTTP_TIMEOUT_SECS))
            })?;
        }

        if let Ok(val) = env::var(ENV_MAX_PAGES) {
            self.max_pages = val.parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", ENV_MAX_PAGES))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings no client could work with
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "settings.http-timeout-secs must be greater than zero",
            ));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_config(
                "settings.max-pages must be greater than zero",
            ));
        }
        Ok(())
    }
}
