// src/filings/locator.rs
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the full filing inside each filing directory.
pub const FILING_DETAILS_FILE: &str = "filing-details.html";

/// Which slice of the download tree to read: `<doc_type>/<year>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingSelector {
    pub doc_type: String, // e.g. "10-K"
    pub year: String,     // two-digit year folder, e.g. "19"
}

/// Finds `filing-details.html` paths under
/// `<base>/<doc_type>/<year>/<filer id>/<filing id>/`.
///
/// Hidden entries are skipped at every level. Paths come back sorted so a
/// given tree always yields the same order.
#[derive(Debug, Clone)]
pub struct DocumentLocator {
    base_path: PathBuf,
}

impl DocumentLocator {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Lists the filing documents for a doc type and year. A missing year or
    /// doc type directory yields an empty list.
    pub fn list(&self, selector: &FilingSelector) -> Vec<PathBuf> {
        let year_dir = self.base_path.join(&selector.doc_type).join(&selector.year);

        let mut paths = Vec::new();
        for filer_dir in visible_subdirs(&year_dir) {
            for filing_dir in visible_subdirs(&filer_dir) {
                paths.push(filing_dir.join(FILING_DETAILS_FILE));
            }
        }
        paths.sort();

        tracing::debug!(
            "Located {} {} filings for year {} under {}",
            paths.len(),
            selector.doc_type,
            selector.year,
            year_dir.display()
        );
        paths
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

// Subdirectories of `dir`, ignoring hidden names and plain files.
fn visible_subdirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("No listing for {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| !is_hidden(&entry.file_name()))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}
