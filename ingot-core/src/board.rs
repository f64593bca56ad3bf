// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! PlatformIO board manifest parsing.
//!
//! Boards are described by JSON manifests (`esp32dev.json`, ...) whose
//! `build` and `upload` sections carry the flash parameters the merge
//! step needs. Only that subset is modeled; everything else in the
//! manifest is ignored.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_MCU: &str = "esp32";
pub const DEFAULT_FLASH_MODE: &str = "dio";
pub const DEFAULT_FLASH_FREQ: &str = "40m";
pub const DEFAULT_FLASH_SIZE: &str = "4MB";

/// Flash-relevant subset of a board manifest. Every field is optional;
/// an empty `BoardConfig` resolves to the esp32 defaults.
#[derive(Deserialize, Default, Clone, Debug)]
pub struct BoardConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub upload: UploadSection,
}

#[derive(Deserialize, Default, Clone, Debug)]
pub struct BuildSection {
    #[serde(default)]
    pub mcu: String,
    #[serde(default)]
    pub flash_mode: String,
    /// Flash frequency in Hz, as manifests write it (`"40000000L"`).
    #[serde(default)]
    pub f_flash: String,
}

#[derive(Deserialize, Default, Clone, Debug)]
pub struct UploadSection {
    #[serde(default)]
    pub flash_size: String,
}

impl BoardConfig {
    /// Load a board manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open board manifest {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse board manifest {}", path.display()))
    }

    /// Target MCU, `esp32` when the manifest does not say.
    pub fn mcu(&self) -> &str {
        if self.build.mcu.is_empty() {
            DEFAULT_MCU
        } else {
            &self.build.mcu
        }
    }

    /// Flash mode for merged images. Quad-I/O modes go into the image
    /// header as their dual equivalents, which is what the ROM loader
    /// expects before the app reconfigures the flash.
    pub fn flash_mode(&self) -> &str {
        match self.build.flash_mode.as_str() {
            "qio" => "dio",
            "qout" => "dout",
            "" => DEFAULT_FLASH_MODE,
            mode => mode,
        }
    }

    /// Flash frequency in the `<MHz>m` form the merge tool takes,
    /// converted from the manifest's Hz value (`40000000L` -> `40m`).
    pub fn flash_freq(&self) -> String {
        let hz = self
            .build
            .f_flash
            .trim()
            .trim_end_matches(['l', 'L'])
            .parse::<u64>();
        match hz {
            Ok(hz) if hz >= 1_000_000 => format!("{}m", hz / 1_000_000),
            _ => DEFAULT_FLASH_FREQ.to_string(),
        }
    }

    /// Flash size, `4MB` when the manifest does not say.
    pub fn flash_size(&self) -> &str {
        if self.upload.flash_size.is_empty() {
            DEFAULT_FLASH_SIZE
        } else {
            &self.upload.flash_size
        }
    }
}
