//! Merging and filtering of completion candidates.

use crate::commands::cursor::TokenCursor;
use itertools::Itertools;
use std::cmp::Ordering;

pub fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate
        .to_lowercase()
        .starts_with(&prefix.to_lowercase())
}

/// Case-insensitive ordering with an ordinal tie-break, so the result is
/// total and deterministic.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Keeps the candidates starting with `partial`. With no partial token every
/// candidate is kept.
pub fn filter_by_prefix<I, S>(partial: Option<&str>, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let candidates = candidates.into_iter().map(Into::into);
    match partial {
        Some(partial) => candidates
            .filter(|candidate| starts_with_ignore_case(candidate, partial))
            .collect(),
        None => candidates.collect(),
    }
}

/// Filters `candidates` against the token under the cursor. When the cursor
/// is exhausted the full list comes back unfiltered.
pub fn complete_token<I, S>(cursor: &TokenCursor<'_>, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let partial = cursor.peek().ok();
    filter_by_prefix(partial.as_deref(), candidates)
}

pub fn sort_ignore_case(candidates: &mut [String]) {
    candidates.sort_by(|a, b| cmp_ignore_case(a, b));
}

/// Concatenates suggestion lists, dropping later duplicates.
pub fn merge<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    lists.into_iter().flatten().unique().collect()
}
