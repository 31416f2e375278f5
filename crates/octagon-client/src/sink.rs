use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use octagon_core::error::AppError;
use octagon_core::models::FighterRecord;
use octagon_core::traits::RecordSink;

/// Writes records as one CSV file with a header row.
///
/// The header is always written, even for an empty crawl. Parent directories
/// are created as needed.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn write(&self, records: &[FighterRecord]) -> Result<(), AppError> {
        ensure_parent(&self.path)?;
        let mut writer = csv::Writer::from_path(&self.path).map_err(csv_error)?;

        writer
            .write_record(FighterRecord::COLUMNS)
            .map_err(csv_error)?;
        for record in records {
            writer.write_record(record.values()).map_err(csv_error)?;
        }
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), rows = records.len(), "CSV written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes records as a pretty-printed JSON array.
///
/// JSON keeps strings as strings, so the spreadsheet marker is dropped from
/// the `Record` field.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonSink {
    fn write(&self, records: &[FighterRecord]) -> Result<(), AppError> {
        ensure_parent(&self.path)?;
        let plain: Vec<FighterRecord> = records
            .iter()
            .map(|r| FighterRecord {
                record: r.record_text().to_string(),
                ..r.clone()
            })
            .collect();

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &plain)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).map_err(|e| {
            AppError::OutputError(format!("Failed to create {}: {e}", dir.display()))
        }),
        _ => Ok(()),
    }
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::OutputError(e.to_string())
}
