// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Partition table lookups.
//!
//! ESP-IDF partition tables are CSV files whose first line is a header
//! naming the columns (`# Name, Type, SubType, Offset, Size, Flags`).
//! The leading `#` marks the header as a comment for other tools; the
//! labels still live there, so columns are located by label after
//! stripping the marker and surrounding whitespace.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

const NAME_LABEL: &str = "Name";
const OFFSET_LABEL: &str = "Offset";

/// Find the flash offset of the partition called `name`.
///
/// Rows are scanned in file order and the first row whose name cell
/// equals `name` is terminal: its offset cell decides the result even
/// when empty or unparseable. `Ok(None)` covers every no-match case
/// (no such row, header without name/offset columns, bad offset cell);
/// `Err` is reserved for I/O failures. The file handle is released when
/// the call returns.
pub fn find_partition_offset(path: &Path, name: &str) -> Result<Option<u32>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open partition table {}", path.display()))?;
    scan(BufReader::new(file), name)
}

fn scan<R: BufRead>(reader: R, name: &str) -> Result<Option<u32>> {
    let mut lines = reader.lines();

    // Header row: first non-empty line.
    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Ok(None),
        }
    };
    let Some((name_col, offset_col)) = column_indices(&header) else {
        return Ok(None);
    };

    for line in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.get(name_col).copied() != Some(name) {
            continue;
        }
        // First match wins.
        return Ok(cells.get(offset_col).and_then(|cell| parse_offset(cell)));
    }

    Ok(None)
}

/// Locate the name and offset columns from the header labels.
fn column_indices(header: &str) -> Option<(usize, usize)> {
    let mut name_col = None;
    let mut offset_col = None;
    for (idx, cell) in header.split(',').enumerate() {
        match cell.trim().trim_start_matches('#').trim_start() {
            NAME_LABEL => name_col = name_col.or(Some(idx)),
            OFFSET_LABEL => offset_col = offset_col.or(Some(idx)),
            _ => {}
        }
    }
    Some((name_col?, offset_col?))
}

/// Parse an offset cell: `0x` hex, plain decimal, or a decimal with a
/// `K`/`M` suffix (x1024 / x1024^2), case-insensitive.
pub fn parse_offset(cell: &str) -> Option<u32> {
    let cell = cell.trim().to_ascii_lowercase();
    if let Some(hex) = cell.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(kilo) = cell.strip_suffix('k') {
        kilo.parse::<u32>().ok()?.checked_mul(1024)
    } else if let Some(mega) = cell.strip_suffix('m') {
        mega.parse::<u32>().ok()?.checked_mul(1024 * 1024)
    } else {
        cell.parse().ok()
    }
}
