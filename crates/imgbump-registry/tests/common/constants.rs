//! Shared test data

/// Repository used by most tests
pub const REPO: &str = "org/app";

/// Strict semver tag filter
pub const SEMVER_PATTERN: &str = r"^v\d+\.\d+\.\d+$";

pub const DIGEST_A: &str =
    "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const DIGEST_B: &str =
    "sha256:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const DIGEST_C: &str =
    "sha256:cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

/// Quay emits RFC 1123 timestamps with a numeric zone
pub const T1: &str = "Mon, 01 Jan 2024 00:00:00 -0000";
pub const T2: &str = "Thu, 01 Feb 2024 00:00:00 -0000";
pub const T3: &str = "Fri, 01 Mar 2024 00:00:00 -0000";
