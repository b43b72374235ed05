//! Type definitions for image update configuration

mod config_types;
mod runtime_config;

pub use config_types::*;
pub use runtime_config::*;
