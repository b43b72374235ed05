//! Common test infrastructure for imgbump-registry tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Repository names, digests, timestamps
//! - `mock_server`: Wiremock setup helpers for the Quay tag API and ACR manifests

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod mock_server;

pub use constants::*;
pub use mock_server::*;
