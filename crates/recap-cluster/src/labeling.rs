//! Human-readable names for clusters derived from their dominant keywords.

use std::collections::HashMap;

pub const MIXED_ACTIVITY_LABEL: &str = "Mixed activity";
pub const MISCELLANEOUS_FEATURE_NAME: &str = "Miscellaneous work";

/// The `limit` most frequent tokens, ties broken by first appearance.
pub fn top_keywords<'a, I>(token_lists: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut counts = HashMap::<&str, (usize, usize)>::new();
    let mut next_order = 0usize;
    for tokens in token_lists {
        for token in tokens {
            let entry = counts.entry(token.as_str()).or_insert_with(|| {
                let order = next_order;
                next_order += 1;
                (0, order)
            });
            entry.0 += 1;
        }
    }

    let mut ranked = counts.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|(_, (left_count, left_order)), (_, (right_count, right_order))| {
        right_count
            .cmp(left_count)
            .then_with(|| left_order.cmp(right_order))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|(token, _)| token.to_string())
        .collect()
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut characters = word.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

/// `"A & B"` from the two leading keywords, `"A"` from one, otherwise a source-based fallback.
pub fn thematic_label<'a>(keywords: &[String], sources: impl IntoIterator<Item = &'a str>) -> String {
    match keywords {
        [first, second, ..] => format!("{} & {}", capitalize(first), capitalize(second)),
        [only] => capitalize(only),
        [] => {
            let mut sources = sources.into_iter();
            match sources.next() {
                Some(first) if sources.all(|source| source == first) => {
                    format!("{first} activity")
                }
                _ => MIXED_ACTIVITY_LABEL.to_string(),
            }
        }
    }
}

/// Capitalized keywords joined with `", "`, or the miscellaneous fallback.
pub fn feature_name(keywords: &[String]) -> String {
    if keywords.is_empty() {
        return MISCELLANEOUS_FEATURE_NAME.to_string();
    }
    keywords
        .iter()
        .map(|keyword| capitalize(keyword))
        .collect::<Vec<_>>()
        .join(", ")
}
