//! CSV delivery of export tables.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use backoffice_view::ExportTable;
use chrono::NaiveDate;
use tracing::info;

use crate::error::Result;

/// Writes `table` as CSV: header row first, then one line per row.
pub fn write_csv<W: Write>(writer: W, table: &ExportTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders `table` as a CSV string.
pub fn to_csv_string(table: &ExportTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Export file name: `<entity>-<YYYY-MM-DD>.csv`.
pub fn export_file_name(entity: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", entity, date.format("%Y-%m-%d"))
}

/// Writes `table` into `dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn write_export_file(
    dir: &Path,
    entity: &str,
    date: NaiveDate,
    table: &ExportTable,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(entity, date));
    let file = File::create(&path)?;
    write_csv(file, table)?;
    info!(path = %path.display(), rows = table.len(), "export written");
    Ok(path)
}
