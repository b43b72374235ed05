//! Commit and pull request text for a set of updates

use crate::record::UpdateRecord;
use std::collections::BTreeMap;

const DEFAULT_TITLE: &str = "Update image digests";
const NO_UPDATES_BODY: &str = "No images were updated";
const BODY_HEADER: &str = "This PR updates the following container image digests:";

/// Environments listed ahead of the alphabetical rest
const LEADING_ENVIRONMENTS: &[&str] = &["dev", "int"];

/// Commit message for the applied updates, or `None` if nothing changed
pub fn commit_message(records: &[UpdateRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut message = format!("{}\n\n", DEFAULT_TITLE);
    for record in records {
        message.push_str(&format!(
            "- {} ({}): {} -> {}\n",
            record.name, record.environment, record.old_digest, record.new_digest
        ));
    }
    Some(message)
}

/// Pull request title and body, one section per environment
pub fn pr_title_body(records: &[UpdateRecord]) -> (String, String) {
    if records.is_empty() {
        return (DEFAULT_TITLE.to_string(), NO_UPDATES_BODY.to_string());
    }

    let by_env = group_by_environment(records);
    let envs = ordered_environments(&by_env);

    let title = format!("updated image components for {}", envs.join("/"));

    let mut body = format!("{}\n\n", BODY_HEADER);
    for env in &envs {
        body.push_str(&format!("### {} Environment\n", capitalize(env)));
        for (name, digest) in &by_env[*env] {
            body.push_str(&format!("- **{}**: `{}`\n", name, digest));
        }
        body.push('\n');
    }

    (title, body)
}

/// environment → image name → new digest; a later record for the same
/// image and environment wins
fn group_by_environment(records: &[UpdateRecord]) -> BTreeMap<&str, BTreeMap<&str, &str>> {
    let mut by_env: BTreeMap<&str, BTreeMap<&str, &str>> = BTreeMap::new();
    for record in records {
        by_env
            .entry(record.environment.as_str())
            .or_default()
            .insert(record.name.as_str(), record.new_digest.as_str());
    }
    by_env
}

fn ordered_environments<'a>(by_env: &BTreeMap<&'a str, BTreeMap<&str, &str>>) -> Vec<&'a str> {
    let mut envs: Vec<&str> = LEADING_ENVIRONMENTS
        .iter()
        .copied()
        .filter(|env| by_env.contains_key(env))
        .collect();
    // BTreeMap keys are already sorted
    envs.extend(
        by_env
            .keys()
            .copied()
            .filter(|env| !LEADING_ENVIRONMENTS.contains(env)),
    );
    envs
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
