// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Factory image merge and version stamping tool for ESP32 firmware builds.
//!
//! Usage:
//!   ingot version --format define
//!   ingot merge --build-dir .pio/build/esp32dev --prog-name firmware \
//!     --board boards/esp32dev.json --image 0x1000:bootloader.bin \
//!     --image 0x8000:partitions.bin --partition-table partitions.csv \
//!     --fs-image littlefs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder().filter_level(level).init();

    cli::run(args)
}
