//! Tag selection: choose which tag's digest to pin

use crate::error::{Error, Result};
use crate::timestamp::compare_timestamps;
use crate::types::Tag;
use regex::Regex;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Suffixes of signature, attestation and SBOM companion tags
pub const METADATA_TAG_SUFFIXES: &[&str] = &[".sig", ".att", ".sbom"];

/// Whether a tag is a registry metadata artifact rather than an image
pub fn is_metadata_tag(name: &str) -> bool {
    METADATA_TAG_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Compile a tag filter (unanchored search semantics)
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Tags that match `pattern`, are not metadata artifacts, and carry a digest
pub fn eligible_tags<'a>(tags: &'a [Tag], pattern: Option<&Regex>) -> Vec<&'a Tag> {
    tags.iter()
        .filter(|tag| {
            if let Some(re) = pattern {
                if !re.is_match(&tag.name) {
                    return false;
                }
            }
            if is_metadata_tag(&tag.name) {
                trace!("Skipping metadata tag: {}", tag.name);
                return false;
            }
            if tag.digest().is_none() {
                trace!("Skipping tag without digest: {}", tag.name);
                return false;
            }
            true
        })
        .collect()
}

/// Most recently modified tag; on equal timestamps the later one wins
pub fn newest<'a>(candidates: &[&'a Tag]) -> Option<&'a Tag> {
    candidates.iter().copied().fold(None, |best, tag| match best {
        Some(current) if compare_timestamps(&tag.last_modified, &current.last_modified)
            == Ordering::Less =>
        {
            Some(current)
        }
        _ => Some(tag),
    })
}

/// Pick the digest to pin for `repository` from a full tag listing
pub fn select_digest(repository: &str, tags: &[Tag], pattern: Option<&Regex>) -> Result<String> {
    let candidates = eligible_tags(tags, pattern);

    debug!(
        "Found {} eligible tag(s) of {} for {}",
        candidates.len(),
        tags.len(),
        repository
    );

    let selected = newest(&candidates).ok_or_else(|| Error::NoMatchingTags {
        repository: repository.to_string(),
        pattern: pattern.map(Regex::as_str).unwrap_or("").to_string(),
    })?;

    debug!(
        "Selected tag {} (last modified: {})",
        selected.name, selected.last_modified
    );

    // eligible tags always carry a digest
    Ok(selected.digest().unwrap_or_default().to_string())
}
