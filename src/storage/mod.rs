// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::ResultTable;
use crate::utils::error::StorageError;

/// Summary written next to a result table.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub doc_type: String,
    pub year: String,
    pub requested_amount: usize,
    pub processed: usize,
    pub ranges: Vec<RangeSummary>,
    pub table_file: String,
    pub extraction_timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSummary {
    pub range: String,
    pub found: usize,
}

impl RunMetadata {
    pub fn from_table(
        table: &ResultTable,
        doc_type: &str,
        year: &str,
        requested_amount: usize,
        table_file: &Path,
    ) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            year: year.to_string(),
            requested_amount,
            processed: table.len(),
            ranges: table
                .found_counts()
                .into_iter()
                .map(|(range, found)| RangeSummary {
                    range: range.to_string(),
                    found,
                })
                .collect(),
            table_file: table_file.display().to_string(),
            extraction_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes the table as CSV: `paths` then one column per range.
    /// Absent values are written as empty fields.
    pub fn save_table(&self, table: &ResultTable, file_name: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(file_name);
        let mut wtr = csv::Writer::from_path(&file_path)?;

        wtr.write_record(table.header())?;
        for (path, cells) in table.rows() {
            let path = path.display().to_string();
            let record = std::iter::once(path.as_str()).chain(cells.into_iter().map(|c| c.unwrap_or("")));
            wtr.write_record(record)?;
        }
        wtr.flush()?;

        tracing::info!("Saved {} rows to {}", table.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves run metadata in JSON format beside the table.
    pub fn save_run_metadata(&self, metadata: &RunMetadata, file_name: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(file_name);

        let metadata_str = serde_json::to_string_pretty(metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}
