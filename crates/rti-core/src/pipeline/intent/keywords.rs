use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::lexicon::Lexicon;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static pattern compiles"));

const MIN_KEYWORD_CHARS: usize = 3;

/// Lower-cased, de-duplicated tokens in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token unless it is already present. Returns whether it was inserted.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into().to_lowercase();
        if token.is_empty() || self.contains(&token) {
            return false;
        }
        self.0.push(token);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|existing| existing == token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

/// Tokenize free text into the keyword set used for department and category matching.
///
/// Punctuation becomes whitespace, tokens shorter than three characters and stop words
/// are dropped. Works on any script; `\w` is Unicode-aware.
pub fn extract_keywords(lexicon: &Lexicon, text: &str) -> KeywordSet {
    let normalized = text.trim().to_lowercase();
    let cleaned = NON_WORD.replace_all(&normalized, " ");

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|token| !lexicon.is_stop_word(token))
        .collect()
}
