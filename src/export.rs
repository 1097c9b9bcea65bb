//! CSV and JSON renderings of a result set

use crate::models::Row;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    time_iso: String,
    signature: &'a str,
    slot: Option<u64>,
    fee_sol: String,
    error: String,
}

impl<'a> From<&'a Row> for CsvRecord<'a> {
    fn from(row: &'a Row) -> Self {
        Self {
            time_iso: row.timestamp.map(format_timestamp).unwrap_or_default(),
            signature: row.signature.as_deref().unwrap_or_default(),
            slot: row.slot,
            fee_sol: format!("{:.9}", lamports_to_sol(row.fee_lamports)),
            error: row
                .error
                .as_ref()
                .map(|err| err.to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// RFC 3339 in UTC, or empty for an out-of-range timestamp.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Columns: `time_iso, signature, slot, fee_sol, error`.
pub fn write_csv<W: Write>(rows: &[Row], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(CsvRecord::from(row))?;
    }
    if rows.is_empty() {
        wtr.write_record(["time_iso", "signature", "slot", "fee_sol", "error"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(rows: &[Row], writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

pub fn export_csv(rows: &[Row], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(rows, BufWriter::new(file))?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn export_json(rows: &[Row], path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(rows, &mut writer)?;
    writer.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
