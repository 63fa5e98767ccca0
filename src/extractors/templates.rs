// src/extractors/templates.rs

// --- Imports ---
use regex::bytes::{Regex, RegexBuilder};

use crate::extractors::normalize::NormalizedDocument;
use crate::sections::SectionRange;
use crate::utils::error::ExtractError;

/// One authoring convention for a pair of section headings in legacy filing HTML.
///
/// Each variant renders to a byte pattern with a single capture group holding the
/// markup between the start heading and the end heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingTemplate {
    /// `style="...font-weight:bold;">Item 7.`
    BoldStyle,
    /// `<b>Item 7.`
    BoldTag,
    /// `Item 7.</b>`
    ClosingBold,
    /// `Item 7. Management's Discussion.</b`
    DescribedClosingBold,
    /// `<b><font ...>Item 7.`
    BoldFont,
    /// `ITEM 7.</b>`
    UppercaseClosingBold,
    /// `underline;">Item 7</font>`, end heading written `Item 7A.</font>`
    UnderlineBare,
    /// `underline;">Item 7.</font>`
    UnderlinePeriod,
    /// `<font ...>Item 7:`
    FontColon,
    /// `<font ...>Item 7.</font>`
    FontPeriod,
    /// plain `Item 7.` ending at `<font ...>Item 7A.</font>`
    PlainToFont,
    /// `<b><font ...>Item 7` with no punctuation
    BoldFontBare,
    /// described start heading as in `DescribedClosingBold`, plain `<b>Item 7A.` end
    DescribedToBoldTag,
}

impl HeadingTemplate {
    /// Priority order tuned against the 10-K corpus. Earlier entries win.
    pub const LEGACY_ORDER: [HeadingTemplate; 13] = [
        HeadingTemplate::BoldStyle,
        HeadingTemplate::BoldTag,
        HeadingTemplate::ClosingBold,
        HeadingTemplate::DescribedClosingBold,
        HeadingTemplate::BoldFont,
        HeadingTemplate::UppercaseClosingBold,
        HeadingTemplate::UnderlineBare,
        HeadingTemplate::UnderlinePeriod,
        HeadingTemplate::FontColon,
        HeadingTemplate::FontPeriod,
        HeadingTemplate::PlainToFont,
        HeadingTemplate::BoldFontBare,
        HeadingTemplate::DescribedToBoldTag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeadingTemplate::BoldStyle => "bold-style",
            HeadingTemplate::BoldTag => "bold-tag",
            HeadingTemplate::ClosingBold => "closing-bold",
            HeadingTemplate::DescribedClosingBold => "described-closing-bold",
            HeadingTemplate::BoldFont => "bold-font",
            HeadingTemplate::UppercaseClosingBold => "uppercase-closing-bold",
            HeadingTemplate::UnderlineBare => "underline-bare",
            HeadingTemplate::UnderlinePeriod => "underline-period",
            HeadingTemplate::FontColon => "font-colon",
            HeadingTemplate::FontPeriod => "font-period",
            HeadingTemplate::PlainToFont => "plain-to-font",
            HeadingTemplate::BoldFontBare => "bold-font-bare",
            HeadingTemplate::DescribedToBoldTag => "described-to-bold-tag",
        }
    }

    /// Renders the pattern source for a range. Labels are escaped; the caller
    /// compiles it case-insensitively.
    pub fn pattern(&self, range: &SectionRange) -> String {
        let (s, e) = match self {
            HeadingTemplate::UppercaseClosingBold => (
                regex::escape(&range.start.as_str().to_uppercase()),
                regex::escape(&range.end.as_str().to_uppercase()),
            ),
            _ => (
                regex::escape(range.start.as_str()),
                regex::escape(range.end.as_str()),
            ),
        };

        match self {
            HeadingTemplate::BoldStyle => {
                format!(r#"bold;">\s*{s}\.(.+?)bold;">\s*{e}\."#)
            }
            HeadingTemplate::BoldTag => format!(r"b>\s*{s}\.(.+?)b>\s*{e}\."),
            HeadingTemplate::ClosingBold | HeadingTemplate::UppercaseClosingBold => {
                format!(r"{s}\.\s*</b>(.+?){e}\.\s*</b>")
            }
            HeadingTemplate::DescribedClosingBold => {
                format!(r"{s}\.\s*[^<>]+\.\s*</b(.+?){e}\.\s*[^<>]+\.\s*</b")
            }
            HeadingTemplate::BoldFont => {
                format!(r"b>\s*<font[^>]+>\s*{s}\.(.+?)b>\s*<font[^>]+>\s*{e}\.")
            }
            HeadingTemplate::UnderlineBare => {
                format!(r#"underline;">\s*{s}</font>(.+?)underline;">\s*{e}\.\s*</font>"#)
            }
            HeadingTemplate::UnderlinePeriod => {
                format!(r#"underline;">\s*{s}\.</font>(.+?)underline;">\s*{e}\.\s*</font>"#)
            }
            HeadingTemplate::FontColon => {
                format!(r"<font[^>]+>\s*{s}:(.+?)<font[^>]+>\s*{e}:\s*")
            }
            HeadingTemplate::FontPeriod => {
                format!(r"<font[^>]+>\s*{s}\.</font>(.+?)<font[^>]+>\s*{e}\.")
            }
            HeadingTemplate::PlainToFont => format!(r"{s}\.(.+?)<font[^>]+>\s*{e}\.</font>"),
            HeadingTemplate::BoldFontBare => {
                format!(r"b>\s*<font[^>]+>\s*{s}(.+?)b>\s*<font[^>]+>\s*{e}\s*</font>")
            }
            HeadingTemplate::DescribedToBoldTag => {
                format!(r"{s}\.\s*[^<>]+\.\s*</b(.+?)b>\s*{e}\.")
            }
        }
    }

    /// Compiles this template for one range.
    pub fn compile(&self, range: &SectionRange) -> Result<PatternExtractionStrategy, ExtractError> {
        let regex = RegexBuilder::new(&self.pattern(range))
            .case_insensitive(true)
            .unicode(false)
            .build()?;

        Ok(PatternExtractionStrategy {
            template: *self,
            regex,
        })
    }
}

/// Anything that can try to pull a section's interior out of a normalized filing.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the interior span on a match, `None` otherwise.
    fn attempt<'d>(&self, document: &'d NormalizedDocument) -> Option<&'d [u8]>;
}

/// A compiled `HeadingTemplate`.
#[derive(Debug, Clone)]
pub struct PatternExtractionStrategy {
    template: HeadingTemplate,
    regex: Regex,
}

impl ExtractionStrategy for PatternExtractionStrategy {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn attempt<'d>(&self, document: &'d NormalizedDocument) -> Option<&'d [u8]> {
        self.regex
            .captures(document.as_bytes())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
    }
}

/// The ordered strategies for one section range.
pub struct PatternTemplateSet {
    range: SectionRange,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PatternTemplateSet {
    /// Compiles `templates` for `range`, keeping their order.
    pub fn compile(range: SectionRange, templates: &[HeadingTemplate]) -> Result<Self, ExtractError> {
        let strategies = templates
            .iter()
            .map(|t| t.compile(&range).map(|s| Box::new(s) as Box<dyn ExtractionStrategy>))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { range, strategies })
    }

    /// The 13 legacy 10-K templates in priority order.
    pub fn legacy(range: SectionRange) -> Result<Self, ExtractError> {
        Self::compile(range, &HeadingTemplate::LEGACY_ORDER)
    }

    #[cfg(test)]
    pub fn from_strategies(range: SectionRange, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { range, strategies }
    }

    pub fn range(&self) -> &SectionRange {
        &self.range
    }

    pub fn strategies(&self) -> &[Box<dyn ExtractionStrategy>] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }
}
