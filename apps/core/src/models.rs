use serde::{Deserialize, Serialize};
use validator::Validate;

/// A feed headline as produced by ingestion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct Item {
    /// Name of the feed the item came from (e.g. `hn`).
    #[validate(length(min = 1))]
    pub feed: String,
    /// Globally unique identifier of the item; falls back to the link upstream.
    #[validate(length(min = 1))]
    pub guid: String,
    /// Link to the item.
    #[serde(default)]
    pub link: String,
    /// The headline text.
    pub title: String,
    /// Human judgement: `Some(true)` liked, `Some(false)` disliked, `None` unjudged.
    #[serde(default)]
    pub judgement: Option<bool>,
    /// Derived score; recomputed whenever the backend changes.
    #[serde(default)]
    pub score: f64,
}

impl Item {
    /// Creates an unjudged item with a zero score.
    pub fn new(feed: impl Into<String>, guid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            feed: feed.into(),
            guid: guid.into(),
            link: String::new(),
            title: title.into(),
            judgement: None,
            score: 0.0,
        }
    }

    /// Returns the item with the given judgement recorded.
    pub fn judged(mut self, liked: bool) -> Self {
        self.judgement = Some(liked);
        self
    }

    pub fn is_judged(&self) -> bool {
        self.judgement.is_some()
    }
}

/// The ranked page handed to the presentation layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedPage {
    /// The top items, highest score first.
    pub items: Vec<Item>,
    /// Number of items in `items`.
    pub shown: usize,
    /// Number of scored items that did not make the cut.
    pub elided: usize,
}
