// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Core logic for the ingot build tool.
//!
//! Planning and parsing only: version-chain evaluation, partition-table
//! lookups, board-manifest reads, and merge-plan assembly. Spawning the
//! external tools (`git` aside) and all user-facing output belong to the
//! CLI crate.

pub mod board;
pub mod merge;
pub mod partition;
pub mod version;

// Re-export commonly used types
pub use board::BoardConfig;
pub use merge::{build_plan, FlashImage, MergeConfig, MergePlan, MERGE_UNSUPPORTED_MCU};
pub use version::{resolve_repo_version, resolve_version, VersionQuery, BUILD_INFO, VERSION_QUERIES};
