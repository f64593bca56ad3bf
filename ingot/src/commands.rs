// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for version stamping and image merging.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};
use log::debug;

use ingot_core::board::BoardConfig;
use ingot_core::merge::{self, MergeConfig};
use ingot_core::version::{self, BUILD_INFO};

use crate::cli::{MergeArgs, VersionFormat};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Resolve and print the build version.
pub fn version(repo: &Path, format: VersionFormat) -> Result<()> {
    let version = version::resolve_repo_version(repo);
    let line = match format {
        VersionFormat::Plain => version,
        VersionFormat::Define => version::as_define(BUILD_INFO, &version),
        VersionFormat::CargoEnv => version::as_cargo_env(BUILD_INFO, &version),
    };
    println!("{}", line);
    Ok(())
}

/// Merge the flash segments into one factory image.
pub fn merge(args: MergeArgs) -> Result<()> {
    let board = match &args.board {
        Some(path) => {
            let board = BoardConfig::from_file(path)?;
            debug!("board {:?}: mcu {}", board.name, board.mcu());
            board
        }
        None => BoardConfig::default(),
    };

    let cfg = MergeConfig {
        chip: args.chip.unwrap_or_else(|| board.mcu().to_string()),
        build_dir: args.build_dir,
        prog_name: args.prog_name,
        app_offset: args.app_offset,
        extra_images: args.images,
        partition_table: args.partition_table,
        fs_image: args.fs_image,
        output: args.output,
        flash_mode: args
            .flash_mode
            .unwrap_or_else(|| board.flash_mode().to_string()),
        flash_freq: args.flash_freq.unwrap_or_else(|| board.flash_freq()),
        flash_size: args
            .flash_size
            .unwrap_or_else(|| board.flash_size().to_string()),
    };

    let Some(plan) = merge::build_plan(&cfg) else {
        debug!("multi-image merge is not supported on {}, skipping", cfg.chip);
        return Ok(());
    };

    if args.dry_run {
        println!("{} {}", args.esptool, plan.args().join(" "));
        return Ok(());
    }

    debug!("running {} {}", args.esptool, plan.args().join(" "));
    let status = Command::new(&args.esptool)
        .args(plan.args())
        .status()
        .with_context(|| format!("Failed to run {}", args.esptool))?;
    if !status.success() {
        bail!("{} exited with {}", args.esptool, status);
    }

    let merged = fs::read(&plan.output)
        .with_context(|| format!("Failed to read {}", plan.output.display()))?;
    println!(
        "Merged image: {} ({} bytes, CRC32: 0x{:08x})",
        plan.output.display(),
        merged.len(),
        CRC32.checksum(&merged)
    );

    Ok(())
}
