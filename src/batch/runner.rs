// src/batch/runner.rs
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::batch::table::ResultTable;
use crate::extractors::{normalize, SectionExtractor};
use crate::filings::{DocumentLocator, FilingSelector};
use crate::sections::SectionRange;
use crate::utils::error::{DocumentError, ExtractError};

type DocumentTask = JoinHandle<Result<Vec<Option<String>>, DocumentError>>;

/// Emitted once per document, as soon as its row is in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub path: PathBuf,
    pub position: usize, // 1-based
    pub total: usize,
}

type ProgressHook = Box<dyn Fn(&Progress) + Send + Sync>;

/// Drives locate -> read -> normalize -> extract over a batch of filings.
pub struct BatchRunner {
    locator: DocumentLocator,
    selector: FilingSelector,
    extractors: Arc<Vec<SectionExtractor>>,
    workers: usize,
    on_progress: Option<ProgressHook>,
}

impl BatchRunner {
    /// Compiles one extractor per range. Runs sequentially until `with_workers`
    /// says otherwise.
    pub fn new(
        locator: DocumentLocator,
        selector: FilingSelector,
        ranges: &[SectionRange],
    ) -> Result<Self, ExtractError> {
        let extractors = ranges
            .iter()
            .cloned()
            .map(SectionExtractor::for_range)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            locator,
            selector,
            extractors: Arc::new(extractors),
            workers: 1,
            on_progress: None,
        })
    }

    /// Number of documents processed at once. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Called after each row is appended, in row order.
    pub fn with_progress<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(hook));
        self
    }

    pub fn range_keys(&self) -> Vec<String> {
        self.extractors.iter().map(|e| e.range().key()).collect()
    }

    /// Processes up to `amount` documents in locator order.
    ///
    /// Unreadable documents and unmatched ranges become empty cells; neither
    /// stops the batch. At most `workers` documents are in flight, and the oldest
    /// one is always collected first, so rows land in original index order and
    /// progress is reported as each row lands.
    pub async fn run(&self, amount: usize) -> ResultTable {
        let paths = self.locator.list(&self.selector);
        let total = amount.min(paths.len());
        tracing::info!(
            "Processing {} of {} located {} filings with {} worker(s)",
            total,
            paths.len(),
            self.selector.doc_type,
            self.workers
        );

        let mut table = ResultTable::new(self.range_keys());
        let mut in_flight: VecDeque<(PathBuf, DocumentTask)> = VecDeque::with_capacity(self.workers);
        for path in paths.into_iter().take(total) {
            if in_flight.len() >= self.workers {
                if let Some((done, handle)) = in_flight.pop_front() {
                    self.collect_row(&mut table, done, handle, total).await;
                }
            }

            let extractors = Arc::clone(&self.extractors);
            let task_path = path.clone();
            let handle = tokio::task::spawn_blocking(move || process_document(&task_path, &extractors));
            in_flight.push_back((path, handle));
        }
        while let Some((done, handle)) = in_flight.pop_front() {
            self.collect_row(&mut table, done, handle, total).await;
        }

        for column in table.columns() {
            let found = column.values.iter().filter(|v| v.is_some()).count();
            tracing::info!("{}: found in {}/{} documents", column.name, found, table.len());
        }
        table
    }

    async fn collect_row(&self, table: &mut ResultTable, path: PathBuf, handle: DocumentTask, total: usize) {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(DocumentError::Worker {
                path: path.clone(),
                reason: e.to_string(),
            })
        });
        let values = match outcome {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("{}", e);
                vec![None; self.extractors.len()]
            }
        };

        table.push_row(path.clone(), values);
        let progress = Progress {
            path,
            position: table.len(),
            total,
        };
        tracing::debug!("Row {}/{} appended for {}", progress.position, progress.total, progress.path.display());
        if let Some(hook) = &self.on_progress {
            hook(&progress);
        }
    }
}

/// Full pipeline for one document: one cell per extractor, in extractor order.
fn process_document(
    path: &Path,
    extractors: &[SectionExtractor],
) -> Result<Vec<Option<String>>, DocumentError> {
    let raw = std::fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = normalize(&raw);
    drop(raw);
    tracing::debug!("Normalized {} ({} bytes)", path.display(), document.len());

    let values = extractors
        .iter()
        .map(|extractor| match extractor.extract_section(&document) {
            Some(section) => {
                tracing::debug!(
                    "{} found in {} by template '{}' ({} bytes of markup)",
                    section.section_name,
                    path.display(),
                    section.strategy,
                    section.content_html.len()
                );
                Some(section.text)
            }
            None => {
                tracing::warn!(
                    "No matched sections: {} found in {}.",
                    extractor.range(),
                    path.display()
                );
                None
            }
        })
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filings::locator::FILING_DETAILS_FILE;
    use crate::sections::SectionCatalog;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    fn selector() -> FilingSelector {
        FilingSelector {
            doc_type: "10-K".to_string(),
            year: "19".to_string(),
        }
    }

    fn bold_block(start: &str, body: &str, end: &str) -> String {
        format!(
            "<html><body>\n<p style=\"font-weight:bold;\">{start}.</p><p>{body}</p><p style=\"font-weight:bold;\">{end}.</p>\n</body></html>"
        )
    }

    fn write_filing(base: &TempDir, filer: &str, html: Option<&str>) -> PathBuf {
        let dir = base.path().join("10-K").join("19").join(filer).join("0001");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(FILING_DETAILS_FILE);
        if let Some(html) = html {
            fs::write(&path, html).unwrap();
        }
        path
    }

    fn runner(base: &TempDir, ranges: &[(&str, &str)]) -> BatchRunner {
        let catalog = SectionCatalog::ten_k();
        let ranges: Vec<SectionRange> = ranges
            .iter()
            .map(|(start, end)| catalog.range(start, end).unwrap())
            .collect();
        BatchRunner::new(DocumentLocator::new(base.path()), selector(), &ranges).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_three_documents() {
        let base = tempdir().unwrap();
        let a = write_filing(&base, "100", Some(&bold_block("Item 7", "A-TEXT", "Item 7A")));
        let b = write_filing(&base, "200", Some(&bold_block("Item 7", "B-TEXT", "Item 7A")));
        let c = write_filing(&base, "300", Some("<html><body><p>Item 7 nothing here</p></body></html>"));

        let table = runner(&base, &[("Item 7", "Item 7A")]).run(10).await;

        assert_eq!(table.len(), 3);
        assert_eq!(table.paths(), &[a, b, c]);
        assert_eq!(
            table.column("Item 7 to Item 7A").unwrap(),
            &[Some("A-TEXT".to_string()), Some("B-TEXT".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_amount_is_clamped() {
        let base = tempdir().unwrap();
        write_filing(&base, "1", Some(&bold_block("Item 7", "one", "Item 7A")));
        write_filing(&base, "2", Some(&bold_block("Item 7", "two", "Item 7A")));
        let runner = runner(&base, &[("Item 1A", "Item 1B"), ("Item 7", "Item 7A")]);

        for (amount, expected) in [(0, 0), (1, 1), (2, 2), (50, 2)] {
            let table = runner.run(amount).await;
            assert_eq!(table.len(), expected, "amount {}", amount);
            for column in table.columns() {
                assert_eq!(column.values.len(), expected);
            }
        }
    }

    #[tokio::test]
    async fn test_unreadable_document_keeps_its_row() {
        let base = tempdir().unwrap();
        write_filing(&base, "1", Some(&bold_block("Item 1A", "risks", "Item 1B")));
        let missing = write_filing(&base, "2", None);
        write_filing(&base, "3", Some(&bold_block("Item 1A", "more risks", "Item 1B")));

        let table = runner(&base, &[("Item 1A", "Item 1B"), ("Item 7", "Item 7A")])
            .run(3)
            .await;

        assert_eq!(table.len(), 3);
        assert_eq!(table.paths()[1], missing);
        assert_eq!(
            table.column("Item 1A to Item 1B").unwrap(),
            &[Some("risks".to_string()), None, Some("more risks".to_string())]
        );
        assert_eq!(table.column("Item 7 to Item 7A").unwrap(), &[None::<String>, None, None]);
    }

    #[tokio::test]
    async fn test_workers_preserve_locator_order() {
        let base = tempdir().unwrap();
        let mut expected = Vec::new();
        for i in 0..12 {
            let body = format!("doc-{:02}", i);
            // Vary the size so workers finish out of order.
            let padding = "<p>filler</p>".repeat((12 - i) * 200);
            let html = format!(
                "{}{}",
                bold_block("Item 7", &body, "Item 7A"),
                padding
            );
            write_filing(&base, &format!("{:02}", i), Some(&html));
            expected.push(Some(body));
        }

        let table = runner(&base, &[("Item 7", "Item 7A")])
            .with_workers(4)
            .run(usize::MAX)
            .await;

        assert_eq!(table.len(), 12);
        assert_eq!(table.column("Item 7 to Item 7A").unwrap(), expected.as_slice());
        let mut sorted = table.paths().to_vec();
        sorted.sort();
        assert_eq!(table.paths(), sorted.as_slice());
    }

    #[tokio::test]
    async fn test_missing_year_yields_empty_table() {
        let base = tempdir().unwrap();
        let table = runner(&base, &[("Item 7", "Item 7A")]).run(5).await;
        assert!(table.is_empty());
        assert_eq!(table.header(), vec!["paths", "Item 7 to Item 7A"]);
    }

    #[tokio::test]
    async fn test_progress_is_reported_before_later_documents_are_read() {
        let base = tempdir().unwrap();
        let first = write_filing(&base, "1", Some(&bold_block("Item 7", "one", "Item 7A")));
        write_filing(&base, "2", Some(&bold_block("Item 7", "two", "Item 7A")));
        let third = write_filing(&base, "3", Some(&bold_block("Item 7", "late", "Item 7A")));

        // Removing the third filing when the first row lands only affects the
        // result if the third filing has not been read yet.
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let third_path = third.clone();
        let table = runner(&base, &[("Item 7", "Item 7A")])
            .with_progress(move |progress| {
                if progress.position == 1 {
                    fs::remove_file(&third_path).unwrap();
                }
                recorder.lock().unwrap().push(progress.clone());
            })
            .run(3)
            .await;

        assert_eq!(
            table.column("Item 7 to Item 7A").unwrap(),
            &[Some("one".to_string()), Some("two".to_string()), None]
        );
        let seen = seen.lock().unwrap();
        let positions: Vec<(usize, usize)> = seen.iter().map(|p| (p.position, p.total)).collect();
        assert_eq!(positions, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(seen[0].path, first);
        assert_eq!(seen[2].path, third);
    }
}
