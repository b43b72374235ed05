use serde::{Deserialize, Serialize};

/// Tag metadata as reported by the Quay tag API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "v1.2.3", "latest")
    pub name: String,
    /// Manifest digest; absent or empty for tags that are not yet usable
    #[serde(default)]
    pub manifest_digest: Option<String>,
    /// Last-modified timestamp in whatever format the registry emits
    #[serde(default)]
    pub last_modified: String,
}

impl Tag {
    pub fn new(
        name: impl Into<String>,
        digest: Option<&str>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            manifest_digest: digest.map(str::to_string),
            last_modified: last_modified.into(),
        }
    }

    /// Digest, treating an empty string as absent
    pub fn digest(&self) -> Option<&str> {
        self.manifest_digest.as_deref().filter(|d| !d.is_empty())
    }
}

/// One page of the Quay tag listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub has_additional: bool,
}
