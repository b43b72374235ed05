//! Registry digest resolution for imgbump
//!
//! This crate provides functionality for:
//! - Crawling the Quay tag API and selecting the newest matching tag
//! - Resolving the `latest` manifest digest on Azure Container Registry
//! - Dispatching a registry host to the right client
//!
//! # Example
//!
//! ```no_run
//! use imgbump_core::RuntimeSettings;
//! use imgbump_registry::ResolverRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ResolverRegistry::with_defaults(RuntimeSettings::default());
//!     let resolver = registry.resolver_for("quay.io")?;
//!
//!     let digest = resolver
//!         .resolve_digest("org/frontend", Some(r"^v\d+\.\d+\.\d+$"))
//!         .await?;
//!     println!("Resolved to: {}", digest);
//!
//!     Ok(())
//! }
//! ```

pub mod acr;
pub mod error;
mod http;
pub mod quay;
pub mod resolver;
pub mod selector;
pub mod timestamp;
pub mod types;

pub use acr::{AcrClient, ENV_ACR_TOKEN, ENV_ACR_TOKEN_FALLBACK};
pub use error::{Error, Result};
pub use quay::QuayClient;
pub use resolver::{DigestResolver, ResolverFactory, ResolverRegistry};
pub use selector::{compile_pattern, is_metadata_tag, select_digest};
pub use types::{Tag, TagPage};
