// src/extractors/text.rs
use scraper::Html;

/// Reduces an HTML fragment to its rendered text: text nodes in document
/// order, all markup dropped. Invalid UTF-8 is replaced, not rejected.
pub fn to_plain_text(fragment: &[u8]) -> String {
    let html = String::from_utf8_lossy(fragment);
    let parsed = Html::parse_fragment(&html);
    parsed.root_element().text().collect::<String>()
}
