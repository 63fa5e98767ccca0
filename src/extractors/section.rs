// src/extractors/section.rs

// --- Imports ---
use crate::extractors::normalize::NormalizedDocument;
use crate::extractors::templates::PatternTemplateSet;
use crate::extractors::text::to_plain_text;
use crate::sections::SectionRange;
use crate::utils::error::ExtractError;

// --- Data Structures ---
/// Raw interior span of a section and the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMatch<'d> {
    pub strategy_index: usize,
    pub fragment: &'d [u8],
}

#[derive(Debug, Clone)]
pub struct ExtractedSection {
    pub section_name: String, // e.g., "Item 7 to Item 7A"
    pub strategy: String,     // name of the template that matched
    pub content_html: String, // The raw HTML between the two headings
    pub text: String,         // content_html with markup removed
}

// --- Main Extractor Structure ---
/// Runs a range's templates in priority order and stops at the first hit.
pub struct SectionExtractor {
    templates: PatternTemplateSet,
}

impl SectionExtractor {
    pub fn new(templates: PatternTemplateSet) -> Self {
        tracing::debug!("{}: {} extraction templates", templates.range(), templates.len());
        Self { templates }
    }

    /// Extractor backed by the legacy 10-K templates.
    pub fn for_range(range: SectionRange) -> Result<Self, ExtractError> {
        Ok(Self::new(PatternTemplateSet::legacy(range)?))
    }

    pub fn range(&self) -> &SectionRange {
        self.templates.range()
    }

    /// First-match-wins search. A later template is never consulted once an
    /// earlier one matched, whatever it would have returned.
    pub fn extract<'d>(&self, document: &'d NormalizedDocument) -> Option<SectionMatch<'d>> {
        self.templates
            .strategies()
            .iter()
            .enumerate()
            .find_map(|(strategy_index, strategy)| {
                strategy.attempt(document).map(|fragment| SectionMatch {
                    strategy_index,
                    fragment,
                })
            })
    }

    /// `extract` followed by text cleaning. A match whose text is blank still
    /// counts as found.
    pub fn extract_section(&self, document: &NormalizedDocument) -> Option<ExtractedSection> {
        let found = self.extract(document)?;
        let strategy = self.templates.strategies()[found.strategy_index].name().to_string();
        tracing::trace!(
            "{} matched by template '{}' ({} bytes)",
            self.range(),
            strategy,
            found.fragment.len()
        );

        Some(ExtractedSection {
            section_name: self.range().key(),
            strategy,
            content_html: String::from_utf8_lossy(found.fragment).into_owned(),
            text: to_plain_text(found.fragment),
        })
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::normalize::normalize;
    use crate::extractors::templates::{ExtractionStrategy, HeadingTemplate};
    use crate::sections::SectionCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn extractor(start: &str, end: &str) -> SectionExtractor {
        SectionExtractor::for_range(SectionCatalog::ten_k().range(start, end).unwrap()).unwrap()
    }

    #[test]
    fn test_bold_styled_block_returns_interior_text() {
        let html = r#"<html><body>
            <p style="font-weight:bold;">Item 1A.</p>
            <p>CONTENT</p>
            <p style="font-weight:bold;">Item 1B.</p>
            </body></html>"#;
        let doc = normalize(html.as_bytes());
        let extractor = extractor("Item 1A", "Item 1B");

        let found = extractor.extract(&doc).expect("bold block should match");
        assert_eq!(found.strategy_index, 0);
        assert_eq!(found.fragment, br#"</p> <p>CONTENT</p> <p style="font-weight:"#);

        let section = extractor.extract_section(&doc).unwrap();
        assert_eq!(section.section_name, "Item 1A to Item 1B");
        assert_eq!(section.strategy, "bold-style");
        assert_eq!(section.text, to_plain_text(found.fragment));
        assert_eq!(section.text.trim(), "CONTENT");
    }

    #[test]
    fn test_first_match_wins_over_later_template() {
        // Satisfies bold-font (#5) around FONT-TEXT and bold-tag (#2) around BOLD-TEXT.
        let html = concat!(
            r#"<b><font size="2">Item 7.</font></b><p>FONT-TEXT</p><b><font size="2">Item 7A.</font></b>"#,
            r#"<div><b>Item 7.</b><p>BOLD-TEXT</p><b>Item 7A.</b></div>"#,
        );
        let doc = normalize(html.as_bytes());
        let range = SectionCatalog::ten_k().range("Item 7", "Item 7A").unwrap();

        let bold_font = HeadingTemplate::BoldFont.compile(&range).unwrap();
        let font_span = bold_font.attempt(&doc).expect("document should satisfy bold-font");
        assert!(String::from_utf8_lossy(font_span).contains("FONT-TEXT"));

        let section = extractor("Item 7", "Item 7A").extract_section(&doc).unwrap();
        assert_eq!(section.strategy, "bold-tag");
        assert!(section.text.contains("BOLD-TEXT"));
        assert!(!section.text.contains("FONT-TEXT"));
    }

    struct CountingStrategy {
        name: &'static str,
        result: Option<&'static [u8]>,
        calls: Arc<AtomicUsize>,
    }

    impl ExtractionStrategy for CountingStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn attempt<'d>(&self, _document: &'d NormalizedDocument) -> Option<&'d [u8]> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    #[test]
    fn test_stops_evaluating_after_first_match() {
        let calls: Vec<Arc<AtomicUsize>> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let results: [Option<&'static [u8]>; 3] = [
            None,
            Some(&b"<p>second</p>"[..]),
            Some(&b"<p>third, longer and cleaner</p>"[..]),
        ];
        let strategies = results
            .iter()
            .zip(["first", "second", "third"])
            .zip(&calls)
            .map(|((result, name), calls)| {
                Box::new(CountingStrategy {
                    name,
                    result: *result,
                    calls: Arc::clone(calls),
                }) as Box<dyn ExtractionStrategy>
            })
            .collect();
        let range = SectionCatalog::ten_k().range("Item 7", "Item 7A").unwrap();
        let extractor = SectionExtractor::new(PatternTemplateSet::from_strategies(range, strategies));

        let section = extractor.extract_section(&normalize(b"anything")).unwrap();
        assert_eq!(section.strategy, "second");
        assert_eq!(section.text, "second");
        assert_eq!(calls[0].load(Ordering::SeqCst), 1);
        assert_eq!(calls[1].load(Ordering::SeqCst), 1);
        assert_eq!(calls[2].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_template_matches() {
        let doc = normalize(b"<p>Item 7. Discussion</p><p>text</p><p>Item 7A. Market Risk</p>");
        let extractor = extractor("Item 7", "Item 7A");
        assert!(extractor.extract(&doc).is_none());
        assert!(extractor.extract_section(&doc).is_none());
    }

    #[test]
    fn test_blank_interior_counts_as_found() {
        // closing-bold matches with nothing but a line break between the headings.
        let doc = normalize(b"<p>Item 7.</b> <br> Item 7A.</b></p>");
        let section = extractor("Item 7", "Item 7A")
            .extract_section(&doc)
            .expect("a blank match is still a match");
        assert_eq!(section.strategy, "closing-bold");
        assert_eq!(section.content_html, " <br> ");
        assert!(section.text.trim().is_empty());
    }
}
