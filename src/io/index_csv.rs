//! `index.csv` read/write operations
//!
//! The index is a two-column `id,word` CSV consumed by the front end. The
//! sampler also needs the raw records (including any extra columns), so both
//! a typed and an untyped reader are provided.

use crate::models::IndexRow;
use crate::Result;
use csv::StringRecord;
use std::fs::{self, File};
use std::path::Path;

/// Write typed index rows with an `id,word` header.
pub fn write_index(path: &Path, rows: &[IndexRow]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read typed index rows.
pub fn read_index(path: &Path) -> Result<Vec<IndexRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Read the header and every record without interpreting columns.
pub fn read_records(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(File::open(path)?);

    let header = reader.headers()?.clone();
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }
    Ok((header, records))
}

/// Write a header followed by raw records.
pub fn write_records(path: &Path, header: &StringRecord, records: &[StringRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;
    writer.write_record(header)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}
