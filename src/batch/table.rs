// src/batch/table.rs
use std::path::{Path, PathBuf};

/// Name of the document path column.
pub const PATHS_COLUMN: &str = "paths";

/// One range's values, aligned with the table's paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// Row-aligned extraction results: a `paths` column plus one column per range.
/// Rows are only ever appended, and every column grows with every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    paths: Vec<PathBuf>,
    columns: Vec<Column>,
}

impl ResultTable {
    pub fn new<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: Vec::new(),
            columns: column_names
                .into_iter()
                .map(|name| Column {
                    name: name.into(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// Appends one document's row. `values` must hold one entry per column,
    /// in column order.
    pub(crate) fn push_row(&mut self, path: PathBuf, values: Vec<Option<String>>) {
        assert_eq!(
            values.len(),
            self.columns.len(),
            "row for {} has {} values for {} columns",
            path.display(),
            values.len(),
            self.columns.len()
        );
        self.paths.push(path);
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.push(value);
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[cfg(test)]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Header row: `paths` followed by the range keys.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(PATHS_COLUMN)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Rows in insertion order: the document path and its cells.
    pub fn rows(&self) -> impl Iterator<Item = (&Path, Vec<Option<&str>>)> + '_ {
        self.paths.iter().enumerate().map(move |(i, path)| {
            let cells = self
                .columns
                .iter()
                .map(|c| c.values[i].as_deref())
                .collect();
            (path.as_path(), cells)
        })
    }

    /// How many rows hold a value, per column.
    pub fn found_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.iter().filter(|v| v.is_some()).count()))
            .collect()
    }
}
