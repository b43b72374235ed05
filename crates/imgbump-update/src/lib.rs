//! Image digest update orchestration for imgbump
//!
//! Provides:
//! - The update run: resolve each image's digest, compare against every
//!   target, and patch changed lines in place
//! - Component include/exclude filtering
//! - Dry-run reporting of would-be changes
//! - Commit message and pull request text for the applied updates

pub mod error;
pub mod filter;
pub mod record;
pub mod report;
pub mod updater;

pub use error::{Error, Result};
pub use filter::ComponentFilter;
pub use record::{UpdateOutcome, UpdateRecord};
pub use report::{commit_message, pr_title_body};
pub use updater::Updater;

/// Current imgbump version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
