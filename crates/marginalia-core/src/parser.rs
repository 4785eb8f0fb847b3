use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

use crate::model::WikiLink;

/// `[[name]]` or `[[name|display]]`. The name stops at `]` or `|`, the
/// display part runs to the closing brackets.
static WIKI_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("wiki link regex"));

static INVALID_FORMAT_CHARS: &[char] = &['[', ']', '<', '>', '{', '}'];

/// Lazy scan over the wiki links of `source`, in increasing `start_index`
/// order. Every call starts a fresh scan.
pub struct WikiLinks<'s> {
    captures: CaptureMatches<'static, 's>,
}

impl Iterator for WikiLinks<'_> {
    type Item = WikiLink;

    fn next(&mut self) -> Option<WikiLink> {
        // Empty names are skipped but their span stays consumed
        for cap in self.captures.by_ref() {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            let Some(name) = cap.get(1) else {
                continue;
            };

            let text = name.as_str().trim();
            if text.is_empty() {
                continue;
            }
            let display_text = cap
                .get(2)
                .map(|display| display.as_str().trim())
                .unwrap_or(text);

            return Some(WikiLink {
                text: text.to_string(),
                display_text: display_text.to_string(),
                start_index: whole.start(),
                end_index: whole.end(),
            });
        }
        None
    }
}

pub fn iter_links(source: &str) -> WikiLinks<'_> {
    WikiLinks {
        captures: WIKI_LINK_REGEX.captures_iter(source),
    }
}

/// Extract all wiki links from `source`
pub fn extract_links(source: &str) -> Vec<WikiLink> {
    iter_links(source).collect()
}

pub fn has_links(source: &str) -> bool {
    iter_links(source).next().is_some()
}

/// Split the text found between `[[` and `]]` into `(text, display_text)`.
///
/// The display text falls back to the text when no alias is given.
pub fn parse_link_text(inner: &str) -> (String, String) {
    let mut parts = inner.split('|').map(str::trim);
    let text = parts.next().unwrap_or_default().to_string();
    let display_text = match parts.next() {
        Some(display) if !display.is_empty() => display.to_string(),
        _ => text.clone(),
    };
    (text, display_text)
}

/// Whether `text` can be used as a link name inside `[[...]]`.
pub fn is_valid_link_format(text: &str) -> bool {
    !text.trim().is_empty() && !text.contains(INVALID_FORMAT_CHARS)
}
