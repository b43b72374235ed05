//! Runtime settings for registry access
//!
//! These control operational behaviour (timeouts, pagination limits) rather
//! than what gets updated. Defaults can be overridden from the `settings`
//! block of the config file, then from `IMGBUMP_*` environment variables,
//! then from CLI flags.

use serde::{Deserialize, Serialize};

/// Operational parameters shared by all registry clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuntimeSettings {
    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Upper bound on tag listing pages fetched for one repository
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_max_pages() -> u32 {
    10_000
}
fn default_user_agent() -> String {
    format!(
        "imgbump/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
