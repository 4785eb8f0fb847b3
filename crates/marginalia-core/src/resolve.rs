//! Matching wiki link names against the title corpus.
//!
//! The corpus is whatever the caller passes in; nothing here caches or
//! reorders it. Matching is exact on the normalized title (lowercase,
//! trimmed). There is no fuzzy matching.

use serde::{Deserialize, Serialize};

use crate::model::{NoteId, NoteTitle, WikiLink};
use crate::parser::iter_links;

/// Case-insensitive, whitespace-trimmed identity key for titles.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// First candidate whose normalized form equals the normalized `link_text`.
///
/// Duplicate titles are not collapsed; the caller's ordering decides which
/// one wins.
pub fn find_matching_note<'a, S: AsRef<str>>(link_text: &str, candidates: &'a [S]) -> Option<&'a str> {
    let normalized = normalize_title(link_text);
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .find(|title| normalize_title(title) == normalized)
}

/// Same as [`find_matching_note`] but keeps the note identity.
pub fn find_matching_entry<'a>(link_text: &str, corpus: &'a [NoteTitle]) -> Option<&'a NoteTitle> {
    let normalized = normalize_title(link_text);
    corpus
        .iter()
        .find(|entry| normalize_title(&entry.title) == normalized)
}

/// Prefix matches first, then substring-only matches, each group in input order.
fn rank_by_prefix<'a, T>(query: &str, items: &'a [T], title: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let normalized = normalize_title(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut prefix_matches = Vec::new();
    let mut contains_matches = Vec::new();
    for item in items {
        let candidate = normalize_title(title(item));
        if candidate.starts_with(&normalized) {
            prefix_matches.push(item);
        } else if candidate.contains(&normalized) {
            contains_matches.push(item);
        }
    }

    prefix_matches.extend(contains_matches);
    prefix_matches
}

pub fn search_by_prefix<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> Vec<&'a str> {
    rank_by_prefix(query, candidates, |s| s.as_ref())
        .into_iter()
        .map(|candidate| candidate.as_ref())
        .collect()
}

/// Autocomplete suggestions for the `[[` popup.
///
/// `exclude` drops the note being edited so it never suggests itself.
pub fn autocomplete<'a>(
    query: &str,
    corpus: &'a [NoteTitle],
    exclude: Option<&NoteId>,
    limit: usize,
) -> Vec<&'a NoteTitle> {
    rank_by_prefix(query, corpus, |entry| entry.title.as_str())
        .into_iter()
        .filter(|entry| Some(&entry.id) != exclude)
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    NotFound,
}

/// A link occurrence together with its resolution against the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMatch {
    pub link: WikiLink,
    pub target: Option<NoteTitle>,
    pub kind: MatchKind,
}

impl LinkMatch {
    pub fn is_orphan(&self) -> bool {
        self.kind == MatchKind::NotFound
    }
}

pub fn resolve_links(source: &str, corpus: &[NoteTitle]) -> Vec<LinkMatch> {
    iter_links(source)
        .map(|link| {
            let target = find_matching_entry(&link.text, corpus).cloned();
            let kind = if target.is_some() {
                MatchKind::Exact
            } else {
                MatchKind::NotFound
            };
            LinkMatch { link, target, kind }
        })
        .collect()
}
