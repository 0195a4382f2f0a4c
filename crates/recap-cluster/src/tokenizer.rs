use std::collections::HashSet;

pub const MIN_TOKEN_CHARS: usize = 3;

const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "onto", "that", "this", "these", "those", "are",
    "was", "were", "been", "being", "have", "has", "had", "not", "but", "all", "any", "can",
    "will", "just", "also", "than", "then", "them", "they", "their", "there", "here", "when",
    "what", "which", "who", "whom", "how", "why", "its", "our", "ours", "out", "off", "over",
    "under", "about", "after", "before", "more", "most", "some", "such", "only", "own", "same",
    "very", "you", "your", "via", "per", "should", "would", "could", "does", "did", "doing",
    "each", "few", "both", "between", "through", "during", "while", "again", "further", "once",
    "because", "until", "against", "above", "below", "down", "now", "too", "her", "his", "she",
    "him", "may", "might", "must", "shall", "yet", "nor", "etc",
];

const COMMIT_VERB_STOPWORDS: &[&str] = &[
    "add", "adds", "added", "adding", "fix", "fixes", "fixed", "fixing", "update", "updates",
    "updated", "updating", "remove", "removes", "removed", "removing", "change", "changes",
    "changed", "improve", "improves", "improved", "make", "makes", "made", "move", "moved",
    "bump", "bumped", "merge", "merged", "initial", "minor", "misc", "wip", "use", "using",
    "used", "new",
];

const COMMIT_TYPE_STOPWORDS: &[&str] = &["feat", "chore", "docs"];

const FEATURE_EXTRA_STOPWORDS: &[&str] = &[
    "implement", "implemented", "implementing", "refactor", "refactored", "refactoring",
    "cleanup", "clean", "tweak", "tweaks", "todo", "stuff", "thing", "things", "work", "working",
    "code", "branch", "main", "master", "pull", "request", "review", "version", "support",
    "handle", "handling", "various",
];

/// Lowercasing, punctuation-stripping tokenizer parameterized by a stopword set.
///
/// Alphanumerics, underscores and hyphens survive; every other non-whitespace
/// character is removed. Tokens shorter than [`MIN_TOKEN_CHARS`], tokens with
/// no alphanumeric character, and stopwords are dropped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Tokenizer {
    pub fn new<'a>(stopwords: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|word| word.trim().to_ascii_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    /// Stopwords used by thematic (TF-IDF) clustering.
    pub fn thematic() -> Self {
        Self::new(
            ENGLISH_STOPWORDS
                .iter()
                .chain(COMMIT_VERB_STOPWORDS)
                .chain(COMMIT_TYPE_STOPWORDS)
                .copied(),
        )
    }

    /// Stopwords used by feature (keyword-overlap) clustering.
    pub fn feature() -> Self {
        Self::new(
            ENGLISH_STOPWORDS
                .iter()
                .chain(COMMIT_VERB_STOPWORDS)
                .chain(COMMIT_TYPE_STOPWORDS)
                .chain(FEATURE_EXTRA_STOPWORDS)
                .copied(),
        )
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text
            .chars()
            .map(|character| {
                if character.is_alphanumeric() || character == '_' || character == '-' {
                    character.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect::<String>();

        normalized
            .split_whitespace()
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }
}
