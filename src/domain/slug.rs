//! Heading anchor slugs.
//!
//! ASCII slugification goes through the `slug` crate; Chinese headings are
//! transliterated with `pinyin` first so “基线对齐” becomes `ji-xian-dui-qi`.

use std::collections::{HashMap, HashSet};

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Anchor used when a heading has no representable text.
pub const FALLBACK_ANCHOR: &str = "section";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a base slug from human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(transliterate_to_ascii(input));
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Anchor candidate for a heading. Never fails; unrepresentable text maps to
/// [`FALLBACK_ANCHOR`].
pub fn anchor_candidate(heading_text: &str) -> String {
    let normalized = heading_text.split_whitespace().collect::<Vec<_>>().join(" ");
    derive_slug(&normalized).unwrap_or_else(|_| FALLBACK_ANCHOR.to_string())
}

/// Hands out unique anchors within one rendered document.
///
/// Duplicates receive monotonic suffixes in document order (`setup`,
/// `setup-2`, `setup-3`).
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, candidate: &str) -> String {
        let base = if candidate.trim().is_empty() {
            FALLBACK_ANCHOR
        } else {
            candidate
        };

        let count = self.occurrences.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let anchor = if *count == 1 {
                base.to_string()
            } else {
                format!("{base}-{}", *count)
            };
            if self.issued.insert(anchor.clone()) {
                return anchor;
            }
        }
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
