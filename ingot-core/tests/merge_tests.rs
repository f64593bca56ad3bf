// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for merge planning.

use std::io::Write;
use std::path::PathBuf;

use ingot_core::merge::{build_plan, FlashImage, MergeConfig, MERGE_UNSUPPORTED_MCU};
use tempfile::NamedTempFile;

const TABLE: &str = "\
# Name,   Type, SubType, Offset,  Size, Flags
nvs,      data, nvs,     0x9000,  0x5000,
app0,     app,  ota_0,   0x10000, 0x140000,
spiffs,   data, spiffs,  0x290000,0x160000,
";

fn make_table(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn make_config() -> MergeConfig {
    MergeConfig {
        chip: "esp32".to_string(),
        build_dir: PathBuf::from("/build"),
        prog_name: "firmware".to_string(),
        app_offset: 0x10000,
        extra_images: vec![
            FlashImage::new(0x1000, "/build/bootloader.bin"),
            FlashImage::new(0x8000, "/build/partitions.bin"),
        ],
        partition_table: None,
        fs_image: None,
        output: None,
        flash_mode: "dio".to_string(),
        flash_freq: "40m".to_string(),
        flash_size: "4MB".to_string(),
    }
}

// =============================================================================
// Plan assembly
// =============================================================================

#[test]
fn test_base_plan_orders_extras_before_app() {
    let plan = build_plan(&make_config()).unwrap();
    assert_eq!(
        plan.images,
        vec![
            FlashImage::new(0x1000, "/build/bootloader.bin"),
            FlashImage::new(0x8000, "/build/partitions.bin"),
            FlashImage::new(0x10000, "/build/firmware.bin"),
        ]
    );
}

#[test]
fn test_app_only_plan() {
    let mut cfg = make_config();
    cfg.extra_images.clear();
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(
        plan.images,
        vec![FlashImage::new(0x10000, "/build/firmware.bin")]
    );
}

#[test]
fn test_derived_paths() {
    let cfg = make_config();
    assert_eq!(cfg.app_image(), PathBuf::from("/build/firmware.bin"));
    assert_eq!(cfg.default_output(), PathBuf::from("/build/firmware_factory.bin"));
}

#[test]
fn test_default_output_used_when_unset() {
    let plan = build_plan(&make_config()).unwrap();
    assert_eq!(plan.output, PathBuf::from("/build/firmware_factory.bin"));
}

#[test]
fn test_output_override_used_verbatim() {
    let mut cfg = make_config();
    cfg.output = Some(PathBuf::from("/tmp/release/factory.bin"));
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(plan.output, PathBuf::from("/tmp/release/factory.bin"));
}

#[test]
fn test_flash_parameters_carried_into_plan() {
    let mut cfg = make_config();
    cfg.chip = "esp32s3".to_string();
    cfg.flash_mode = "dout".to_string();
    cfg.flash_freq = "80m".to_string();
    cfg.flash_size = "8MB".to_string();
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(plan.chip, "esp32s3");
    assert_eq!(plan.flash_mode, "dout");
    assert_eq!(plan.flash_freq, "80m");
    assert_eq!(plan.flash_size, "8MB");
}

#[test]
fn test_esp8266_has_no_plan() {
    let mut cfg = make_config();
    cfg.chip = MERGE_UNSUPPORTED_MCU.to_string();
    assert!(build_plan(&cfg).is_none());
}

// =============================================================================
// Filesystem image via partition lookup
// =============================================================================

#[test]
fn test_partition_lookup_appends_filesystem_image() {
    let table = make_table(TABLE);
    let mut cfg = make_config();
    cfg.partition_table = Some(table.path().to_path_buf());
    cfg.fs_image = Some("spiffs".to_string());
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(plan.images.len(), 4);
    assert_eq!(
        plan.images[3],
        FlashImage::new(0x0029_0000, "/build/spiffs.bin")
    );
    // App position is unchanged; the filesystem image rides at the end.
    assert_eq!(plan.images[2], FlashImage::new(0x10000, "/build/firmware.bin"));
}

#[test]
fn test_filesystem_needs_both_table_and_name() {
    let table = make_table(TABLE);

    let mut cfg = make_config();
    cfg.partition_table = Some(table.path().to_path_buf());
    assert_eq!(build_plan(&cfg).unwrap().images.len(), 3);

    let mut cfg = make_config();
    cfg.fs_image = Some("spiffs".to_string());
    assert_eq!(build_plan(&cfg).unwrap().images.len(), 3);
}

#[test]
fn test_missing_partition_row_omits_filesystem_image() {
    let table = make_table(TABLE);
    let mut cfg = make_config();
    cfg.partition_table = Some(table.path().to_path_buf());
    cfg.fs_image = Some("littlefs".to_string());
    assert_eq!(build_plan(&cfg).unwrap().images.len(), 3);
}

#[test]
fn test_zero_offset_partition_omits_filesystem_image() {
    let table = make_table(
        "\
# Name, Type, SubType, Offset, Size, Flags
spiffs, data, spiffs,  0x0,    0x160000,
",
    );
    let mut cfg = make_config();
    cfg.partition_table = Some(table.path().to_path_buf());
    cfg.fs_image = Some("spiffs".to_string());
    assert_eq!(build_plan(&cfg).unwrap().images.len(), 3);
}

#[test]
fn test_unreadable_table_omits_filesystem_image() {
    let mut cfg = make_config();
    cfg.partition_table = Some(PathBuf::from("/nonexistent/partitions.csv"));
    cfg.fs_image = Some("spiffs".to_string());
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(plan.images.len(), 3);
}

// =============================================================================
// Argument rendering
// =============================================================================

#[test]
fn test_args_layout() {
    let mut cfg = make_config();
    cfg.output = Some(PathBuf::from("/tmp/factory.bin"));
    let plan = build_plan(&cfg).unwrap();
    assert_eq!(
        plan.args(),
        [
            "--chip",
            "esp32",
            "merge_bin",
            "-o",
            "/tmp/factory.bin",
            "--flash_mode",
            "dio",
            "--flash_freq",
            "40m",
            "--flash_size",
            "4MB",
            "0x1000",
            "/build/bootloader.bin",
            "0x8000",
            "/build/partitions.bin",
            "0x10000",
            "/build/firmware.bin",
        ]
    );
}

#[test]
fn test_args_render_offsets_as_hex() {
    let mut cfg = make_config();
    cfg.extra_images = vec![FlashImage::new(2_686_976, "/build/spiffs.bin")];
    let plan = build_plan(&cfg).unwrap();
    assert!(plan.args().contains(&"0x290000".to_string()));
}
