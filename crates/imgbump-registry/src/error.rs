//! Error types for imgbump-registry

use thiserror::Error;

/// Result type alias using imgbump-registry's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Digest resolution errors
///
/// None of these are retried internally; callers decide what to do.
#[derive(Error, Debug)]
pub enum Error {
    /// No registry kind matches the host
    #[error("Unsupported registry: {registry}")]
    UnsupportedRegistry { registry: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection or protocol failure
    #[error("Failed to request {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Registry answered with a non-success status
    #[error("Registry returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to decode registry response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    /// Tag filter is not a valid regular expression
    #[error("Invalid tag pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// Nothing survived pattern filtering and metadata exclusion
    #[error("No tags matching pattern {pattern} found for repository {repository}")]
    NoMatchingTags { repository: String, pattern: String },

    /// A `latest` tag exists but carries no digest
    #[error("latest tag found but no manifest digest available for repository {repository}")]
    LatestWithoutDigest { repository: String },

    /// Client could not be set up (e.g., missing credentials)
    #[error("{registry} client not initialized - {reason}")]
    NotInitialized { registry: String, reason: String },

    /// Manifest response lacked the content digest header
    #[error("Manifest response for {repository} carried no Docker-Content-Digest header")]
    MissingDigestHeader { repository: String },
}

impl Error {
    /// Map a reqwest failure for `url`, separating timeouts from other transport errors
    pub(crate) fn request(url: &str, source: reqwest::Error, timeout_secs: u64) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}
