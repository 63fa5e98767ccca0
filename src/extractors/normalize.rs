// src/extractors/normalize.rs

// Both spellings of the non-breaking space entity seen in filings.
const NBSP_ENTITIES: [&[u8]; 2] = [b"&nbsp;", b"&#160;"];

/// A filing collapsed onto a single line: no CR/LF, no `&nbsp;`/`&#160;`,
/// no run of two spaces, no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    bytes: Vec<u8>,
}

impl NormalizedDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Normalizes raw filing bytes for pattern matching.
///
/// Only whitespace and nbsp entities change; markup and text bytes pass through as-is.
/// The final trim keeps the operation idempotent when an entity or line break
/// sat at either end of the input.
pub fn normalize(raw: &[u8]) -> NormalizedDocument {
    let trimmed = raw.trim_ascii();

    let mut spaced: Vec<u8> = trimmed
        .iter()
        .map(|&b| if b == b'\r' || b == b'\n' { b' ' } else { b })
        .collect();
    for entity in NBSP_ENTITIES {
        spaced = replace_all(&spaced, entity, b" ");
    }

    let mut bytes = Vec::with_capacity(spaced.len());
    for b in spaced {
        if b == b' ' && bytes.last() == Some(&b' ') {
            continue;
        }
        bytes.push(b);
    }

    let trimmed_len = bytes.trim_ascii_end().len();
    bytes.truncate(trimmed_len);
    let lead = bytes.len() - bytes.trim_ascii_start().len();
    bytes.drain(..lead);

    NormalizedDocument { bytes }
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}
