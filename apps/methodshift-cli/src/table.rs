//! Reading and writing record tables
//!
//! `.json` files hold a single JSON array; anything else is JSON Lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn is_json_array(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Read rows from a JSON array or JSON Lines file
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    if is_json_array(path) {
        return serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON array in {}", path.display()));
    }

    let mut rows = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on line {} of {}", number + 1, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write rows as a JSON array or JSON Lines, matching the file extension
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if is_json_array(path) {
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writeln!(writer)?;
    } else {
        write_json_lines(&mut writer, rows)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as JSON Lines to any writer
pub fn write_json_lines<T: Serialize, W: Write>(writer: &mut W, rows: &[T]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writeln!(writer)?;
    }
    Ok(())
}
