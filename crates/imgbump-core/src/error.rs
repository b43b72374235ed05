//! Error types for imgbump-core

use thiserror::Error;

/// Result type alias using imgbump-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for imgbump
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// Target document could not be read
    #[error("Failed to read file {path}: {source}")]
    DocumentRead {
        path: String,
        source: std::io::Error,
    },

    /// Target document is not valid YAML
    #[error("Failed to parse YAML file {path}: {message}")]
    DocumentParse { path: String, message: String },

    /// Logical path does not resolve to a node
    #[error("Path {logical_path} not found in {file}")]
    PathNotFound { file: String, logical_path: String },

    /// Logical path resolves to a mapping, sequence or alias
    #[error("Path {logical_path} in {file} does not point to a scalar value")]
    NotScalar { file: String, logical_path: String },

    /// Scalar text does not sit on its key's line, so it cannot be patched
    /// as a single `key: value` line
    #[error("Path {logical_path} in {file}: value on line {line} is not on its key's line {key_line}")]
    DetachedValue {
        file: String,
        logical_path: String,
        key_line: usize,
        line: usize,
    },

    /// Requested patch line is outside the file
    #[error("Invalid line number {line} for {file} ({total} lines)")]
    LineOutOfRange {
        file: String,
        line: usize,
        total: usize,
    },

    /// Requested patch line has no key separator
    #[error("Line {line} of {file} does not contain a colon")]
    MissingSeparator { file: String, line: usize },

    /// Two different values requested for the same line in one batch
    #[error("Conflicting edits for line {line} of {file}: '{existing}' and '{requested}'")]
    ConflictingEdit {
        file: String,
        line: usize,
        existing: String,
        requested: String,
    },

    /// Patched document could not be written back
    #[error("Failed to write file {path}: {source}")]
    PatchWrite {
        path: String,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a path not found error
    pub fn path_not_found(file: impl Into<String>, logical_path: impl Into<String>) -> Self {
        Self::PathNotFound {
            file: file.into(),
            logical_path: logical_path.into(),
        }
    }

    /// Create a not-a-scalar error
    pub fn not_scalar(file: impl Into<String>, logical_path: impl Into<String>) -> Self {
        Self::NotScalar {
            file: file.into(),
            logical_path: logical_path.into(),
        }
    }

    /// True for errors raised while loading or validating configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::InvalidConfig { .. }
                | Self::MissingField { .. }
                | Self::YamlParse(_)
        )
    }
}
