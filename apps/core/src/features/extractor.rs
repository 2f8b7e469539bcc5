use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::features::tokenizer::Tokenizer;
use crate::models::Item;

/// Returns the canonical text exchanged with the process-backed scorer:
/// the feed name followed by the raw title.
pub fn classifiable_string(item: &Item) -> String {
    format!("{} {}", item.feed, item.title)
}

/// A single binary feature of an item.
///
/// Ordering is derived so that feature sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// The item came from this feed.
    Feed(String),
    /// This word appears in a title from this feed.
    Word { feed: String, word: String },
}

impl Feature {
    /// The feature that must also be present for this one to be counted.
    ///
    /// Word features are conditioned on their feed; feed features are unconditioned.
    pub fn condition(&self) -> Option<Feature> {
        match self {
            Feature::Feed(_) => None,
            Feature::Word { feed, .. } => Some(Feature::Feed(feed.clone())),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Feed(feed) => write!(f, "feed:{}", feed),
            Feature::Word { feed, word } => write!(f, "feed:{}/word:{}", feed, word),
        }
    }
}

/// The set of features present on an item. Absent features are simply not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: BTreeSet<Feature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.features.insert(feature)
    }

    /// Whether `feature` is present.
    pub fn contains(&self, feature: &Feature) -> bool {
        self.features.contains(feature)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a Feature;
    type IntoIter = btree_set::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

/// Extracts feature sets for the statistical backend.
///
/// Extraction is a pure function of the item: no caching, no shared mutable state.
#[derive(Debug)]
pub struct FeatureExtractor {
    tokenizer: Tokenizer,
}

impl FeatureExtractor {
    pub fn new(stemming: bool) -> Self {
        Self {
            tokenizer: Tokenizer::new(stemming),
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The lower-cased, tokenized form of an item: feed name then title words.
    pub fn tokenized_string(&self, item: &Item) -> String {
        let mut parts = vec![item.feed.clone()];
        parts.extend(self.tokenizer.tokenize(&item.title));
        parts.join(" ")
    }

    /// One feed feature plus one (feed, word) feature per distinct title word.
    pub fn extract(&self, item: &Item) -> FeatureSet {
        let mut features = FeatureSet::new();
        features.insert(Feature::Feed(item.feed.clone()));
        for word in self.tokenizer.tokenize(&item.title) {
            features.insert(Feature::Word {
                feed: item.feed.clone(),
                word,
            });
        }
        features
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(true)
    }
}
