//! Common test infrastructure for imgbump-update tests
//!
//! # Modules
//!
//! - `fake_resolver`: In-memory `DigestResolver` with call counting
//! - `fixtures`: Temp workspace with config and target files

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_resolver;
pub mod fixtures;

pub use fake_resolver::*;
pub use fixtures::*;
