//! Image update configuration types (imgbump.yaml)

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::RuntimeSettings;

/// Environment names recognised in target file paths
pub const KNOWN_ENVIRONMENTS: &[&str] = &["dev", "int", "stg", "prod"];

/// Root of the image update configuration file
///
/// Images are kept in declared order so reports come out in the order the
/// file lists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageUpdateConfig {
    /// Image name -> source and targets
    #[serde(default)]
    pub images: IndexMap<String, ImageConfig>,

    /// Operational overrides
    #[serde(default)]
    pub settings: RuntimeSettings,
}

/// A single image's source and target configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Where to fetch the latest digest from
    #[serde(default)]
    pub source: Source,

    /// Where to write the digest
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Registry coordinates for an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Source {
    /// Registry host (e.g., "quay.io", "myregistry.azurecr.io")
    #[serde(default)]
    pub registry: String,

    /// Repository path within the registry (e.g., "org/frontend")
    #[serde(default)]
    pub repository: String,

    /// Optional regular expression restricting candidate tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_pattern: Option<String>,
}

impl Source {
    /// The tag pattern, treating an empty string as absent
    pub fn tag_pattern(&self) -> Option<&str> {
        self.tag_pattern.as_deref().filter(|p| !p.is_empty())
    }
}

/// A scalar location kept in sync with the resolved digest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Target {
    /// Dot-separated path to the scalar (e.g., "frontend.image.digest")
    #[serde(default)]
    pub json_path: String,

    /// File holding the scalar
    #[serde(default)]
    pub file_path: Utf8PathBuf,

    /// Reporting label; derived from `file_path` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl Target {
    /// Environment label used when reporting an update of this target
    ///
    /// Explicit label first, then the first path component naming a known
    /// environment, then the file stem.
    pub fn environment(&self) -> String {
        if let Some(env) = self.environment.as_deref().filter(|e| !e.is_empty()) {
            return env.to_string();
        }
        environment_from_path(&self.file_path)
    }
}

fn environment_from_path(path: &Utf8Path) -> String {
    let from_components = path.components().find_map(|component| {
        let name = component.as_str();
        let name = name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(name);
        KNOWN_ENVIRONMENTS
            .iter()
            .find(|env| **env == name)
            .map(|env| env.to_string())
    });

    from_components
        .or_else(|| path.file_stem().map(str::to_string))
        .unwrap_or_default()
}
