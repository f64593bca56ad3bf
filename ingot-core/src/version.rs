// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Build version resolution from git history.
//!
//! The version string is derived through an ordered chain of git queries,
//! each one weaker than the last: exact release tag, nearest-tag
//! description, bare commit hash. Chain logic is pure and operates on an
//! injected probe so it can be tested without a git checkout; the real
//! probe shells out to the `git` binary.

use std::path::Path;
use std::process::Command;

/// Macro name firmware sources read the resolved version through.
pub const BUILD_INFO: &str = "BUILD_INFO";

/// Version queries in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionQuery {
    /// Tag pointing exactly at HEAD; a release, used verbatim.
    ExactTag,
    /// Nearest tag plus commit distance/hash, or a bare hash when the
    /// repository has no tags at all.
    TagDescribe,
    /// Short commit hash of HEAD.
    ShortHash,
}

/// All version queries in priority order.
pub const VERSION_QUERIES: [VersionQuery; 3] = [
    VersionQuery::ExactTag,
    VersionQuery::TagDescribe,
    VersionQuery::ShortHash,
];

impl VersionQuery {
    /// Arguments passed to `git` for this query.
    pub fn git_args(&self) -> &'static [&'static str] {
        match self {
            VersionQuery::ExactTag => &["describe", "--tags", "--exact-match"],
            VersionQuery::TagDescribe => &["describe", "--tags", "--always"],
            VersionQuery::ShortHash => &["rev-parse", "--short", "HEAD"],
        }
    }

    /// Format a successful query output into the final version string.
    /// Anything short of an exact tag is a nightly build and carries the
    /// build date.
    pub fn render(&self, raw: &str, date: &str) -> String {
        match self {
            VersionQuery::ExactTag => raw.to_string(),
            VersionQuery::TagDescribe | VersionQuery::ShortHash => {
                format!("{}-nightly-{}", raw, date)
            }
        }
    }
}

/// Resolve the version string by trying each query in order.
///
/// `probe` runs one query and returns its non-empty trimmed output, or
/// `None` when the underlying tool failed. The first success wins; when
/// every query fails the terminal `unknown-<date>` form is returned, so
/// resolution itself never fails.
pub fn resolve_version<P>(mut probe: P, date: &str) -> String
where
    P: FnMut(VersionQuery) -> Option<String>,
{
    VERSION_QUERIES
        .iter()
        .find_map(|query| probe(*query).map(|raw| query.render(&raw, date)))
        .unwrap_or_else(|| format!("unknown-{}", date))
}

/// Run one query against the repository at `repo`.
///
/// Returns the trimmed stdout on zero exit. A non-zero exit, empty output,
/// or a missing `git` binary are all recoverable failures; stderr is
/// captured and discarded.
pub fn git_probe(repo: &Path, query: VersionQuery) -> Option<String> {
    let output = Command::new("git")
        .args(query.git_args())
        .current_dir(repo)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let raw = String::from_utf8(output.stdout).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Today's local date in the `YYYY-MM-DD` form nightly versions carry.
pub fn build_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Resolve the build version for the repository at `repo`.
pub fn resolve_repo_version(repo: &Path) -> String {
    let date = build_date();
    resolve_version(|query| git_probe(repo, query), &date)
}

/// Render the version as a `-D` compile definition with escaped quotes,
/// the form build systems splice into compiler flags so firmware sources
/// see a quoted string literal.
pub fn as_define(name: &str, version: &str) -> String {
    format!("-D{}=\\\"{}\\\"", name, version)
}

/// Render the version as a cargo build-script instruction.
pub fn as_cargo_env(name: &str, version: &str) -> String {
    format!("cargo:rustc-env={}={}", name, version)
}
