// src/config.rs
use std::path::PathBuf;

use crate::filings::FilingSelector;
use crate::sections::{SectionCatalog, SectionRange};
use crate::utils::error::{AppError, ExtractError};

/// Ranges scraped when none are given on the command line.
pub const DEFAULT_RANGES: &[(&str, &str)] = &[("Item 1A", "Item 1B"), ("Item 7", "Item 7A")];

/// Parses `"Item 1A:Item 1B"` into its two labels. Labels are validated later,
/// against the catalog.
pub fn parse_range_arg(value: &str) -> Result<(String, String), String> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, e.g. \"Item 1A:Item 1B\", got {:?}", value))?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(format!("both ends of range {:?} must be set", value));
    }
    Ok((start.to_string(), end.to_string()))
}

/// Validated settings for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub selector: FilingSelector,
    pub base_path: PathBuf,
    pub amount: usize,
    pub ranges: Vec<SectionRange>,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub workers: usize,
}

impl RunConfig {
    /// Checks every range against `catalog` before anything is read from disk.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: &SectionCatalog,
        doc_type: &str,
        year: &str,
        base_path: PathBuf,
        amount: usize,
        raw_ranges: &[(String, String)],
        output_dir: PathBuf,
        output_file: Option<String>,
        workers: usize,
    ) -> Result<Self, AppError> {
        if doc_type.trim().is_empty() || year.trim().is_empty() {
            return Err(AppError::Config("doc type and year must not be empty".to_string()));
        }
        if workers == 0 {
            return Err(AppError::Config("workers must be at least 1".to_string()));
        }

        let ranges = if raw_ranges.is_empty() {
            DEFAULT_RANGES
                .iter()
                .map(|(start, end)| catalog.range(start, end))
                .collect::<Result<Vec<_>, ExtractError>>()?
        } else {
            raw_ranges
                .iter()
                .map(|(start, end)| catalog.range(start, end))
                .collect::<Result<Vec<_>, ExtractError>>()?
        };

        let output_file = output_file
            .unwrap_or_else(|| format!("{}-{}-sections.csv", year, doc_type).to_lowercase());

        Ok(Self {
            selector: FilingSelector {
                doc_type: doc_type.to_string(),
                year: year.to_string(),
            },
            base_path,
            amount,
            ranges,
            output_dir,
            output_file,
            workers,
        })
    }

    /// Metadata sidecar name derived from the table file name.
    pub fn metadata_file(&self) -> String {
        let stem = self
            .output_file
            .strip_suffix(".csv")
            .unwrap_or(&self.output_file);
        format!("{}_meta.json", stem)
    }
}
