//! Query Simplifier: shrinks an over-limit X-ray query so the search engine does not
//! silently drop its tail.
//!
//! Strategies, in order:
//! 1. normalize whitespace
//! 2. collapse large OR-groups sharing a leading word prefix into `"<prefix>*"`
//! 3. keep at most 5 exclusion terms (`-term`), moved to the end
//! 4. drop trailing ` AND ` clauses while over the limit (at least 2 are kept)
//!
//! Must-have criteria are expected early in the query, so truncation eats the tail.
//! The result is best effort and may still exceed the limit.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::search::word_count::is_query_too_long;

/// Minimum `OR` count for a group to be considered for wildcard collapsing.
const MIN_OR_FOR_COLLAPSE: usize = 3;
const MAX_EXCLUSIONS: usize = 5;
const AND_SEPARATOR: &str = " AND ";
const MIN_AND_SEGMENTS: usize = 2;

fn group_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^()]*\)").expect("Invalid regex"))
}

pub fn simplify_query(query: &str, max_words: usize) -> String {
    let normalized = normalize_whitespace(query);
    let collapsed = collapse_or_groups(&normalized);
    let pruned = prune_exclusions(&collapsed);

    let result = if is_query_too_long(&pruned, max_words) {
        truncate_and_clauses(&pruned, max_words)
    } else {
        pruned
    };

    result.trim().to_string()
}

fn normalize_whitespace(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces every innermost parenthesized group with ≥3 `OR`s whose alternatives all
/// start with the same words by a single wildcard term.
fn collapse_or_groups(query: &str) -> String {
    group_regex()
        .replace_all(query, |caps: &Captures| {
            let group = &caps[0];
            collapse_group(group).unwrap_or_else(|| group.to_string())
        })
        .into_owned()
}

fn collapse_group(group: &str) -> Option<String> {
    let or_count = group
        .split_whitespace()
        .filter(|word| *word == "OR")
        .count();
    if or_count < MIN_OR_FOR_COLLAPSE {
        return None;
    }

    let inner = &group[1..group.len() - 1];
    let alternatives: Vec<&str> = inner
        .split(" OR ")
        .map(|alt| alt.trim().trim_matches('"').trim())
        .collect();

    let prefix = common_word_prefix(&alternatives);
    if prefix.is_empty() {
        None
    } else {
        Some(format!("\"{}*\"", prefix.join(" ")))
    }
}

/// Longest run of leading words shared by all alternatives, compared case-insensitively.
/// Words are returned with the casing of the first alternative.
fn common_word_prefix<'a>(alternatives: &[&'a str]) -> Vec<&'a str> {
    let Some((first, rest)) = alternatives.split_first() else {
        return Vec::new();
    };
    let rest_words: Vec<Vec<&str>> = rest
        .iter()
        .map(|alt| alt.split_whitespace().collect())
        .collect();

    let mut prefix = Vec::new();
    for (i, word) in first.split_whitespace().enumerate() {
        let shared = rest_words.iter().all(|words| {
            words
                .get(i)
                .is_some_and(|other| other.to_lowercase() == word.to_lowercase())
        });
        if !shared {
            break;
        }
        prefix.push(word);
    }
    prefix
}

fn is_exclusion(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('-'))
}

/// Keeps the first five exclusion tokens, moved to the end of the query.
fn prune_exclusions(query: &str) -> String {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let exclusion_count = tokens.iter().filter(|t| is_exclusion(t)).count();
    if exclusion_count <= MAX_EXCLUSIONS {
        return query.to_string();
    }

    let mut kept: Vec<&str> = tokens.iter().copied().filter(|t| !is_exclusion(t)).collect();
    kept.extend(
        tokens
            .iter()
            .copied()
            .filter(|t| is_exclusion(t))
            .take(MAX_EXCLUSIONS),
    );
    kept.join(" ")
}

fn truncate_and_clauses(query: &str, max_words: usize) -> String {
    let mut segments: Vec<&str> = query.split(AND_SEPARATOR).collect();
    while segments.len() > MIN_AND_SEGMENTS
        && is_query_too_long(&segments.join(AND_SEPARATOR), max_words)
    {
        segments.pop();
    }
    segments.join(AND_SEPARATOR)
}
