// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Merge planning for combined factory images.
//!
//! A merge plan is a pure function of an explicit [`MergeConfig`]: the
//! ordered segment list plus the flash parameters the merge tool needs.
//! Executing the plan (spawning the tool) is the caller's business.

use std::path::PathBuf;

use log::{debug, warn};

use crate::partition;

/// Chip family without multi-image merge support.
pub const MERGE_UNSUPPORTED_MCU: &str = "esp8266";

/// One flash segment: where it goes and what gets written there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashImage {
    pub offset: u32,
    pub path: PathBuf,
}

impl FlashImage {
    pub fn new(offset: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            offset,
            path: path.into(),
        }
    }
}

/// Everything the merge step consults, resolved up front by the caller.
#[derive(Clone, Debug)]
pub struct MergeConfig {
    /// Target MCU (`esp32`, `esp32s3`, ...).
    pub chip: String,
    /// Build output directory holding the app and filesystem binaries.
    pub build_dir: PathBuf,
    /// Program name; the app binary is `<build_dir>/<prog_name>.bin`.
    pub prog_name: String,
    /// Flash offset the application image is linked for.
    pub app_offset: u32,
    /// Segments flashed ahead of the app (bootloader, partition table, ...),
    /// in flash order.
    pub extra_images: Vec<FlashImage>,
    /// Partition table to consult for the filesystem offset.
    pub partition_table: Option<PathBuf>,
    /// Partition name of the filesystem image.
    pub fs_image: Option<String>,
    /// Merged image path; `None` means the derived default.
    pub output: Option<PathBuf>,
    pub flash_mode: String,
    pub flash_freq: String,
    pub flash_size: String,
}

impl MergeConfig {
    /// Path of the application binary produced by the build.
    pub fn app_image(&self) -> PathBuf {
        self.build_dir.join(format!("{}.bin", self.prog_name))
    }

    /// Default merged image path.
    pub fn default_output(&self) -> PathBuf {
        self.build_dir.join(format!("{}_factory.bin", self.prog_name))
    }

    fn fs_bin(&self, name: &str) -> PathBuf {
        self.build_dir.join(format!("{}.bin", name))
    }
}

/// A fully assembled merge invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergePlan {
    pub chip: String,
    pub output: PathBuf,
    pub flash_mode: String,
    pub flash_freq: String,
    pub flash_size: String,
    pub images: Vec<FlashImage>,
}

/// Assemble the merge plan for `cfg`.
///
/// Returns `None` for chips without merge support; the caller treats that
/// as a successful no-op. The image order is what ends up on the merge
/// command line: extra images first, then the application, then the
/// filesystem image when the partition lookup finds one.
pub fn build_plan(cfg: &MergeConfig) -> Option<MergePlan> {
    if cfg.chip == MERGE_UNSUPPORTED_MCU {
        return None;
    }

    let mut images = cfg.extra_images.clone();
    images.push(FlashImage::new(cfg.app_offset, cfg.app_image()));
    if let Some(fs) = filesystem_image(cfg) {
        images.push(fs);
    }

    Some(MergePlan {
        chip: cfg.chip.clone(),
        output: cfg.output.clone().unwrap_or_else(|| cfg.default_output()),
        flash_mode: cfg.flash_mode.clone(),
        flash_freq: cfg.flash_freq.clone(),
        flash_size: cfg.flash_size.clone(),
        images,
    })
}

/// Locate the filesystem image through the partition table.
///
/// Needs both the table path and the image name configured. Every failure
/// mode omits the image instead of failing the merge: a factory image
/// without a filesystem is still flashable.
fn filesystem_image(cfg: &MergeConfig) -> Option<FlashImage> {
    let (table, name) = cfg.partition_table.as_deref().zip(cfg.fs_image.as_deref())?;

    let offset = match partition::find_partition_offset(table, name) {
        Ok(Some(offset)) => offset,
        Ok(None) => {
            debug!(
                "no usable partition named {:?} in {}, skipping filesystem image",
                name,
                table.display()
            );
            return None;
        }
        Err(err) => {
            warn!(
                "cannot read partition table {}: {:#}, skipping filesystem image",
                table.display(),
                err
            );
            return None;
        }
    };
    if offset == 0 {
        // Offset 0 is boot-ROM territory; a zero here means a bogus row.
        warn!(
            "partition {:?} has offset 0 in {}, skipping filesystem image",
            name,
            table.display()
        );
        return None;
    }

    Some(FlashImage::new(offset, cfg.fs_bin(name)))
}

impl MergePlan {
    /// Merge tool argument vector: chip, output, flash parameters, then
    /// the flattened `<offset> <path>` pairs in image order.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--chip".to_string(),
            self.chip.clone(),
            "merge_bin".to_string(),
            "-o".to_string(),
            self.output.display().to_string(),
            "--flash_mode".to_string(),
            self.flash_mode.clone(),
            "--flash_freq".to_string(),
            self.flash_freq.clone(),
            "--flash_size".to_string(),
            self.flash_size.clone(),
        ];
        for image in &self.images {
            args.push(format!("0x{:x}", image.offset));
            args.push(image.path.display().to_string());
        }
        args
    }
}
