//! Property-based tests for wiki link extraction and replacement
//!
//! Inputs mix bracket and pipe fragments, whitespace, multibyte text and
//! arbitrary unicode so partial, nested and adjacent links all show up.

use marginalia_core::{extract_links, has_links, iter_links, replace_links, splice_links};
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("[[".to_string()),
        Just("]]".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("|".to_string()),
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just("\t".to_string()),
        Just("독서".to_string()),
        Just("é".to_string()),
        Just("🦀".to_string()),
        "[a-zA-Z0-9]{1,4}",
    ]
}

fn note_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::collection::vec(fragment(), 0..32).prop_map(|parts| parts.concat()),
        1 => any::<String>(),
    ]
}

proptest! {
    /// Property: spans are valid slices, strictly increasing and disjoint
    #[test]
    fn spans_are_ordered_and_disjoint(source in note_text()) {
        let links = extract_links(&source);

        for link in &links {
            prop_assert!(link.start_index < link.end_index);
            prop_assert!(link.end_index <= source.len());
            prop_assert!(source.is_char_boundary(link.start_index));
            prop_assert!(source.is_char_boundary(link.end_index));

            let span = &source[link.span()];
            prop_assert!(span.starts_with("[[") && span.ends_with("]]"),
                "span {:?} is not bracketed", span);
            prop_assert!(!link.text.is_empty());
            prop_assert_eq!(link.text.trim(), link.text.as_str());
        }

        for pair in links.windows(2) {
            prop_assert!(pair[0].start_index < pair[1].start_index);
            prop_assert!(pair[0].end_index <= pair[1].start_index,
                "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    /// Property: repeated and lazy scans agree
    #[test]
    fn extraction_is_deterministic(source in note_text()) {
        let first = extract_links(&source);
        let second = extract_links(&source);
        prop_assert_eq!(&first, &second);

        let lazy: Vec<_> = iter_links(&source).collect();
        prop_assert_eq!(&first, &lazy);
        prop_assert_eq!(has_links(&source), !first.is_empty());
    }

    /// Property: replacing each span with itself gives the input back
    #[test]
    fn identity_callback_roundtrips(source in note_text()) {
        let out = replace_links(&source, |link| source[link.span()].to_string());
        prop_assert_eq!(out, source);
    }

    /// Property: an empty callback deletes exactly the link spans
    #[test]
    fn empty_callback_removes_only_spans(source in note_text()) {
        let links = extract_links(&source);
        let out = replace_links(&source, |_| String::new());

        let removed: usize = links.iter().map(|link| link.end_index - link.start_index).sum();
        prop_assert_eq!(out.len(), source.len() - removed);

        let mut kept = String::new();
        let mut last = 0;
        for link in &links {
            kept.push_str(&source[last..link.start_index]);
            last = link.end_index;
        }
        kept.push_str(&source[last..]);
        prop_assert_eq!(out, kept);
    }

    /// Property: the forward builder and the in-place splice agree
    #[test]
    fn splice_matches_forward_builder(source in note_text()) {
        let render = |link: &marginalia_core::WikiLink| format!("<{}|{}>", link.text, link.display_text);

        let expected = replace_links(&source, render);
        let mut buffer = source.clone();
        splice_links(&mut buffer, render);
        prop_assert_eq!(buffer, expected);
    }
}
