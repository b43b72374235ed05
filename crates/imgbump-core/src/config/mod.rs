//! Configuration loading and management

mod loader;
mod settings;

pub use loader::CONFIG_FILE_NAMES;
pub use settings::{ENV_HTTP_TIMEOUT_SECS, ENV_MAX_PAGES};
