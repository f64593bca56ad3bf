// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use ingot_core::merge::FlashImage;
use ingot_core::partition;

use crate::commands;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "ingot")]
#[command(about = "Factory image merge and version stamping for ESP32 firmware builds")]
pub struct Cli {
    /// Print tool diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the build version from git history
    Version {
        /// Repository to inspect
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Output form
        #[arg(long, value_enum, default_value_t = VersionFormat::Plain)]
        format: VersionFormat,
    },

    /// Merge flash segments into a single factory image
    Merge(MergeArgs),
}

/// How `ingot version` prints the resolved string.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionFormat {
    /// The bare version string
    Plain,
    /// A -DBUILD_INFO=\"...\" compile definition
    Define,
    /// A cargo:rustc-env=BUILD_INFO=... build-script line
    CargoEnv,
}

/// Arguments for the merge subcommand.
#[derive(Args)]
pub struct MergeArgs {
    /// Build output directory holding the app binary
    #[arg(long, value_name = "DIR")]
    pub build_dir: PathBuf,

    /// Program name; the app binary is <DIR>/<NAME>.bin
    #[arg(long, value_name = "NAME")]
    pub prog_name: String,

    /// Board manifest (JSON) providing MCU and flash parameters
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Target MCU, overriding the board manifest
    #[arg(long)]
    pub chip: Option<String>,

    /// Flash offset the app is linked for
    #[arg(long, default_value = "0x10000", value_parser = parse_offset_arg)]
    pub app_offset: u32,

    /// Extra image flashed ahead of the app (repeatable, in flash order)
    #[arg(long = "image", value_name = "OFFSET:PATH", value_parser = parse_image_arg)]
    pub images: Vec<FlashImage>,

    /// Partition table CSV to consult for the filesystem offset
    #[arg(long, value_name = "FILE")]
    pub partition_table: Option<PathBuf>,

    /// Partition name of the filesystem image
    #[arg(long, value_name = "NAME")]
    pub fs_image: Option<String>,

    /// Merged image path [default: <DIR>/<NAME>_factory.bin]
    #[arg(short, long, env = "MERGED_BIN_PATH", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Flash mode override (dio, dout, qio, qout)
    #[arg(long)]
    pub flash_mode: Option<String>,

    /// Flash frequency override (e.g. 40m)
    #[arg(long)]
    pub flash_freq: Option<String>,

    /// Flash size override (e.g. 4MB)
    #[arg(long)]
    pub flash_size: Option<String>,

    /// Merge tool to invoke
    #[arg(long, default_value = "esptool.py")]
    pub esptool: String,

    /// Print the merge command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version { repo, format } => commands::version(&repo, format),
        Commands::Merge(args) => commands::merge(args),
    }
}

fn parse_offset_arg(s: &str) -> Result<u32, String> {
    partition::parse_offset(s).ok_or_else(|| format!("invalid flash offset {:?}", s))
}

fn parse_image_arg(s: &str) -> Result<FlashImage, String> {
    let (offset, path) = s
        .split_once(':')
        .ok_or_else(|| format!("expected OFFSET:PATH, got {:?}", s))?;
    if path.is_empty() {
        return Err(format!("missing image path in {:?}", s));
    }
    Ok(FlashImage::new(parse_offset_arg(offset)?, path))
}
