//! Error types for imgbump-update

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using imgbump-update's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Update run errors, each carrying the image it concerns
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[source] imgbump_core::Error),

    #[error("Failed to resolve digest for image {image}: {source}")]
    Resolve {
        image: String,
        #[source]
        source: imgbump_registry::Error,
    },

    #[error("Failed to read {path} from {file} for image {image}: {source}")]
    Document {
        image: String,
        file: Utf8PathBuf,
        path: String,
        #[source]
        source: imgbump_core::Error,
    },

    #[error("Failed to patch {file} for image {image}: {source}")]
    Patch {
        image: String,
        file: Utf8PathBuf,
        #[source]
        source: imgbump_core::Error,
    },

    #[error("Unknown component(s): {}", .names.join(", "))]
    UnknownComponent { names: Vec<String> },
}

impl Error {
    /// Name of the image the error concerns, if any
    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Resolve { image, .. }
            | Self::Document { image, .. }
            | Self::Patch { image, .. } => Some(image),
            Self::Config(_) | Self::UnknownComponent { .. } => None,
        }
    }

    /// Whether the run failed before touching the network or any file
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownComponent { .. })
    }
}
