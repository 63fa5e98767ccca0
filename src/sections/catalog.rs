// src/sections/catalog.rs
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::ExtractError;

// Leading non-digit text ("Item", "ITEM ", "Part I, item"), then the digit/letter
// token, then nothing but trailing punctuation or whitespace.
static LABEL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\D*?(\d+[A-Z]?)[^A-Z0-9]*$").expect("Failed to compile LABEL_TOKEN_RE")
});

/// Sections an annual report (10-K) may be split at.
const TEN_K_TOKENS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
    "1A", "1B", "7A", "9A", "9B",
];

/// The set of section tokens a filing type permits.
///
/// Catalogs are plain values: build one per filing type and hand it to whatever
/// needs to validate labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCatalog {
    tokens: Vec<String>,
}

impl SectionCatalog {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(|t| t.into().to_uppercase()).collect(),
        }
    }

    /// Catalog for 10-K annual reports: Items 1..15 plus 1A, 1B, 7A, 9A, 9B.
    pub fn ten_k() -> Self {
        Self::new(TEN_K_TOKENS.iter().copied())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Turns a user supplied label ("item 1a", "ITEM 7A.", "9b") into its
    /// canonical `Item <TOKEN>` form.
    pub fn canonicalize(&self, raw_label: &str) -> Result<SectionLabel, ExtractError> {
        let upper = raw_label.trim().to_uppercase();
        let token = LABEL_TOKEN_RE
            .captures(&upper)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|token| self.tokens.iter().any(|t| t == token))
            .ok_or_else(|| ExtractError::InvalidSection {
                label: raw_label.to_string(),
                available: self.tokens().to_vec(),
            })?;

        Ok(SectionLabel(format!("Item {}", token)))
    }

    /// Validates both ends of a range at once.
    pub fn range(&self, start: &str, end: &str) -> Result<SectionRange, ExtractError> {
        Ok(SectionRange {
            start: self.canonicalize(start)?,
            end: self.canonicalize(end)?,
        })
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::ten_k()
    }
}

/// A canonical section heading such as `Item 7A`. Only a catalog can build one,
/// so the token is always upper-cased and equality is effectively case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionLabel(String);

impl SectionLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The text between two headings, excluding both headings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionRange {
    pub start: SectionLabel,
    pub end: SectionLabel,
}

impl SectionRange {
    /// Column key used in the result table, e.g. `Item 1A to Item 1B`.
    pub fn key(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

impl fmt::Display for SectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
