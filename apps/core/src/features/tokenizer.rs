//! Headline tokenization.
//!
//! Titles are lower-cased and split on maximal runs of ASCII letters and
//! apostrophes; everything else (digits, punctuation, whitespace) separates
//! words. Tokens may then be reduced to their English stem.

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::LazyLock;
use tracing::warn;

// NOTE: expect() is acceptable here: the pattern is a compile-time constant.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z']+").expect("Invalid regex: word pattern"));

/// Splits titles into words, optionally stemming each one.
///
/// The tokenizer holds no mutable state, so one instance can be shared by any
/// number of concurrent callers.
pub struct Tokenizer {
    stemmer: Option<Stemmer>,
}

impl Tokenizer {
    /// Creates a tokenizer. With `stemming` enabled every token is reduced with
    /// the Snowball English algorithm.
    pub fn new(stemming: bool) -> Self {
        Self {
            stemmer: stemming.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    pub fn is_stemming(&self) -> bool {
        self.stemmer.is_some()
    }

    /// Tokenizes a title into (possibly stemmed) lower-case words, in order.
    pub fn tokenize(&self, title: &str) -> Vec<String> {
        let lowered = title.to_lowercase();
        WORD_PATTERN
            .find_iter(&lowered)
            .map(|m| self.stem(m.as_str()))
            .collect()
    }

    fn stem(&self, word: &str) -> String {
        let Some(stemmer) = &self.stemmer else {
            return word.to_string();
        };

        let stem = stemmer.stem(word);
        if stem.is_empty() {
            // Apostrophe-only tokens stem to nothing; keep the token as-is.
            warn!(word, "Stemming produced an empty stem, keeping token unstemmed");
            return word.to_string();
        }
        stem.into_owned()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stemming", &self.is_stemming())
            .finish()
    }
}
