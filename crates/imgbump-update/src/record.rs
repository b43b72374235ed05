use camino::Utf8PathBuf;
use serde::Serialize;

/// One target whose digest changed (or would change, in dry-run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    /// Configured image name
    pub name: String,
    /// Environment label used for reporting
    pub environment: String,
    pub file_path: Utf8PathBuf,
    pub json_path: String,
    /// 1-based line holding the digest
    pub line: usize,
    pub old_digest: String,
    pub new_digest: String,
}

/// Result of one update run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Changes written to disk, in processing order
    pub updates: Vec<UpdateRecord>,
    /// Changes found in dry-run mode and not written
    pub pending: Vec<UpdateRecord>,
}

impl UpdateOutcome {
    /// No changes were written or found
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.pending.is_empty()
    }

    /// Records worth reporting: applied updates, else dry-run findings
    pub fn changes(&self) -> &[UpdateRecord] {
        if self.updates.is_empty() {
            &self.pending
        } else {
            &self.updates
        }
    }
}
