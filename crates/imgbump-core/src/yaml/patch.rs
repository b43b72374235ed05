//! In-place rewriting of individual `key: value` lines

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// One line replacement: everything after the line's first colon becomes
/// a single space followed by `value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    /// 1-based physical line
    pub line: usize,
    /// Replacement scalar text
    pub value: String,
}

impl PendingEdit {
    pub fn new(line: usize, value: impl Into<String>) -> Self {
        Self {
            line,
            value: value.into(),
        }
    }
}

/// All pending edits for one file, applied together in a single write
#[derive(Debug, Clone)]
pub struct EditBatch {
    path: Utf8PathBuf,
    edits: BTreeMap<usize, String>,
}

impl EditBatch {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            edits: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Queue an edit; the same line may only be requested with the same value
    pub fn add(&mut self, edit: PendingEdit) -> Result<()> {
        match self.edits.entry(edit.line) {
            Entry::Vacant(slot) => {
                slot.insert(edit.value);
                Ok(())
            }
            Entry::Occupied(existing) if *existing.get() == edit.value => Ok(()),
            Entry::Occupied(existing) => Err(Error::ConflictingEdit {
                file: self.path.to_string(),
                line: edit.line,
                existing: existing.get().clone(),
                requested: edit.value,
            }),
        }
    }

    /// Rewrite the file; returns the number of lines changed
    pub fn apply(self) -> Result<usize> {
        apply_edits(&self.path, &self.edits)?;
        Ok(self.edits.len())
    }
}

/// Re-read `path`, rewrite the requested lines and replace the file atomically
///
/// Nothing is written unless every edit is valid.
pub fn apply_edits(path: &Utf8Path, edits: &BTreeMap<usize, String>) -> Result<()> {
    if edits.is_empty() {
        return Ok(());
    }

    let content = fs::read_to_string(path).map_err(|source| Error::DocumentRead {
        path: path.to_string(),
        source,
    })?;

    let patched = patch_lines(path, &content, edits)?;
    write_atomic(path, &patched)?;

    debug!("Patched {} line(s) in {}", edits.len(), path);
    Ok(())
}

/// Apply edits to in-memory text; `file` is only used for error context
pub fn patch_lines(file: &Utf8Path, content: &str, edits: &BTreeMap<usize, String>) -> Result<String> {
    let mut lines: Vec<String> = content.split('\n').map(str::to_owned).collect();
    let total = lines.len();

    for (&line_no, value) in edits {
        if line_no == 0 || line_no > total {
            return Err(Error::LineOutOfRange {
                file: file.to_string(),
                line: line_no,
                total,
            });
        }

        let line = &lines[line_no - 1];
        let (body, eol) = match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line.as_str(), ""),
        };

        let colon = body.find(':').ok_or_else(|| Error::MissingSeparator {
            file: file.to_string(),
            line: line_no,
        })?;

        lines[line_no - 1] = format!("{} {}{}", &body[..=colon], value, eol);
    }

    Ok(lines.join("\n"))
}

fn write_atomic(path: &Utf8Path, contents: &str) -> Result<()> {
    let write_err = |source: std::io::Error| Error::PatchWrite {
        path: path.to_string(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_err)?;
    }

    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
