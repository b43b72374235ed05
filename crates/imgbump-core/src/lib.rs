//! # imgbump-core
//!
//! Core library for imgbump providing:
//! - Image update configuration parsing and validation
//! - Runtime settings with environment overrides
//! - A line-tracked YAML document locator
//! - An in-place line patcher that never re-serializes the document

pub mod config;
pub mod error;
pub mod types;
pub mod yaml;

pub use error::{Error, Result};
pub use types::{ImageConfig, ImageUpdateConfig, RuntimeSettings, Source, Target};
pub use yaml::{apply_edits, EditBatch, PendingEdit, ScalarValue, YamlDocument};
