use std::collections::HashMap;

use crate::model::{NoteId, NoteTitle, WikiLink};
use crate::parser::{extract_links, iter_links};
use crate::resolve::normalize_title;

const VALID_MARK_OPEN: &str = r#"<mark class="wiki-link-valid">"#;
const INVALID_MARK_OPEN: &str = r#"<mark class="wiki-link-invalid">"#;
const MARK_CLOSE: &str = "</mark>";

/// Rebuild `source` with every link span replaced by `callback(link)`.
///
/// Text between links is copied untouched; offsets always refer to the
/// original string.
pub fn replace_links<F>(source: &str, mut callback: F) -> String
where
    F: FnMut(&WikiLink) -> String,
{
    let mut output = String::with_capacity(source.len());
    let mut last = 0;
    for link in iter_links(source) {
        output.push_str(&source[last..link.start_index]);
        output.push_str(&callback(&link));
        last = link.end_index;
    }
    output.push_str(&source[last..]);
    output
}

/// In-place variant of [`replace_links`].
///
/// Links are spliced from the end of the buffer towards the start so the
/// original offsets stay valid. The callback sees the links in reverse order.
pub fn splice_links<F>(buffer: &mut String, mut callback: F)
where
    F: FnMut(&WikiLink) -> String,
{
    let links = extract_links(buffer);
    for link in links.iter().rev() {
        let replacement = callback(link);
        buffer.replace_range(link.span(), &replacement);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub marked_up_text: String,
    pub valid_links: Vec<WikiLink>,
    pub invalid_links: Vec<WikiLink>,
}

fn highlight_with<F>(source: &str, is_valid: F) -> Highlight
where
    F: Fn(&WikiLink) -> bool,
{
    let mut valid_links = Vec::new();
    let mut invalid_links = Vec::new();

    let marked_up_text = replace_links(source, |link| {
        let original = &source[link.span()];
        if is_valid(link) {
            valid_links.push(link.clone());
            format!("{VALID_MARK_OPEN}{original}{MARK_CLOSE}")
        } else {
            invalid_links.push(link.clone());
            format!("{INVALID_MARK_OPEN}{original}{MARK_CLOSE}")
        }
    });

    Highlight {
        marked_up_text,
        valid_links,
        invalid_links,
    }
}

/// Wrap every link in a `<mark>` for the editor preview.
///
/// Extraction already drops empty names, so every link lands in
/// `valid_links` here. Use [`highlight_resolved`] to flag orphans.
pub fn highlight(source: &str) -> Highlight {
    highlight_with(source, |link| !link.text.is_empty())
}

/// Like [`highlight`], but links that match no title in `corpus` are
/// reported as invalid.
pub fn highlight_resolved(source: &str, corpus: &[NoteTitle]) -> Highlight {
    let titles = title_index(corpus);
    highlight_with(source, |link| titles.contains_key(&normalize_title(&link.text)))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn link_to_html(link: &WikiLink, note_id: &NoteId) -> String {
    format!(
        r#"<a href="/notes/{}" class="wiki-link">{}</a>"#,
        note_id,
        escape_html(&link.display_text)
    )
}

fn orphan_to_html(link: &WikiLink) -> String {
    format!(
        r#"<span class="wiki-link-orphan">{}</span>"#,
        escape_html(&link.display_text)
    )
}

/// Normalized title -> id. The first entry wins on duplicates, same as
/// `find_matching_note`.
fn title_index(corpus: &[NoteTitle]) -> HashMap<String, NoteId> {
    let mut index = HashMap::with_capacity(corpus.len());
    for entry in corpus {
        index.entry(normalize_title(&entry.title)).or_insert(entry.id);
    }
    index
}

/// Render note content for display: resolved links become anchors to the
/// target note, orphan links a dimmed span. Text outside links is copied
/// verbatim.
pub fn render_html(source: &str, corpus: &[NoteTitle]) -> String {
    let titles = title_index(corpus);
    replace_links(source, |link| match titles.get(&normalize_title(&link.text)) {
        Some(id) => link_to_html(link, id),
        None => orphan_to_html(link),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "no links here",
        "[[A]]",
        "[[A]][[B]]",
        "start [[A]] middle [[B|C]] end",
        "[[ ]] [[x]] [[y|]] [[독서|읽기]] tail",
        "[[a]]]] [[[b]] [[c|d|e]]",
    ];

    #[test]
    fn test_identity_callback_roundtrips() {
        for sample in SAMPLES {
            let out = replace_links(sample, |link| sample[link.span()].to_string());
            assert_eq!(&out, sample);
        }
    }

    #[test]
    fn test_empty_callback_removes_only_link_spans() {
        assert_eq!(replace_links("[[A]][[B]]", |_| String::new()), "");
        assert_eq!(
            replace_links("start [[A]] middle [[B|C]] end", |_| String::new()),
            "start  middle  end"
        );
        assert_eq!(replace_links("plain", |_| String::new()), "plain");
    }

    #[test]
    fn test_splice_matches_forward_builder() {
        for sample in SAMPLES {
            let expected = replace_links(sample, |link| format!("<{}>", link.display_text));
            let mut buffer = sample.to_string();
            splice_links(&mut buffer, |link| format!("<{}>", link.display_text));
            assert_eq!(buffer, expected);

            let expected = highlight(sample).marked_up_text;
            let mut buffer = sample.to_string();
            splice_links(&mut buffer, |link| {
                format!("{VALID_MARK_OPEN}{}{MARK_CLOSE}", &sample[link.span()])
            });
            assert_eq!(buffer, expected);
        }
    }

    #[test]
    fn test_highlight_wraps_links() {
        let result = highlight("see [[A]] and [[B|C]].");
        assert_eq!(
            result.marked_up_text,
            r#"see <mark class="wiki-link-valid">[[A]]</mark> and <mark class="wiki-link-valid">[[B|C]]</mark>."#
        );
        assert_eq!(result.valid_links.len(), 2);
        assert!(result.invalid_links.is_empty());
    }

    #[test]
    fn test_highlight_resolved_flags_orphans() {
        let corpus = vec![NoteTitle::new(NoteId::new(), "Known")];
        let result = highlight_resolved("[[known]] [[Unknown]]", &corpus);

        assert_eq!(result.valid_links.len(), 1);
        assert_eq!(result.invalid_links.len(), 1);
        assert_eq!(result.invalid_links[0].text, "Unknown");
        assert!(result
            .marked_up_text
            .ends_with(r#"<mark class="wiki-link-invalid">[[Unknown]]</mark>"#));
    }

    #[test]
    fn test_render_html() {
        let id = NoteId::new();
        let corpus = vec![NoteTitle::new(id, "Meditations")];
        let html = render_html("Read [[meditations|Aurelius]] and [[<b>]].", &corpus);

        assert_eq!(
            html,
            format!(
                r#"Read <a href="/notes/{}" class="wiki-link">Aurelius</a> and <span class="wiki-link-orphan">&lt;b&gt;</span>."#,
                id
            )
        );
    }
}
