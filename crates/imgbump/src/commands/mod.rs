//! CLI command implementations

pub mod update;
pub mod validate;
pub mod version;
