use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::features::{Feature, FeatureExtractor, FeatureSet};
use crate::models::Item;

/// Converts a log-odds value into a probability in `[0, 1]`.
pub fn logistic(log_odds: f64) -> f64 {
    1.0 / (1.0 + (-log_odds).exp())
}

/// Running (liked, disliked) tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub liked: u64,
    pub disliked: u64,
}

impl Counts {
    pub fn record(&mut self, liked: bool) {
        if liked {
            self.liked += 1;
        } else {
            self.disliked += 1;
        }
    }

    /// Add-one smoothed log-odds: `ln((liked + 1) / (disliked + 1))`.
    ///
    /// Always finite, even for zero counts.
    pub fn log_odds(&self) -> f64 {
        ((self.liked as f64 + 1.0) / (self.disliked as f64 + 1.0)).ln()
    }
}

/// An immutable log-odds classifier.
///
/// Scoring sums the initial log-odds with the contribution of every present
/// feature. Features never seen during training contribute nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogOddsModel {
    initial: f64,
    features: BTreeMap<Feature, f64>,
    trained_on: usize,
}

impl LogOddsModel {
    /// A model trained on nothing: every item scores zero log-odds.
    pub fn empty() -> Self {
        Self {
            initial: Counts::default().log_odds(),
            features: BTreeMap::new(),
            trained_on: 0,
        }
    }

    /// Trains a model from every judged item in `items`; unjudged items are skipped.
    pub fn train<'a, I>(items: I, extractor: &FeatureExtractor) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut initial = Counts::default();
        let mut per_feature: BTreeMap<Feature, Counts> = BTreeMap::new();
        let mut trained_on = 0;

        for item in items {
            let Some(liked) = item.judgement else {
                continue;
            };
            trained_on += 1;
            initial.record(liked);

            let features = extractor.extract(item);
            for feature in &features {
                let conditioned = feature
                    .condition()
                    .map_or(true, |condition| features.contains(&condition));
                if !conditioned {
                    debug!(%feature, guid = %item.guid, "Skipping feature without its conditioning feature");
                    continue;
                }
                per_feature.entry(feature.clone()).or_default().record(liked);
            }
        }

        let features: BTreeMap<Feature, f64> = per_feature
            .into_iter()
            .map(|(feature, counts)| (feature, counts.log_odds()))
            .collect();

        info!(
            trained_on,
            features = features.len(),
            initial = initial.log_odds(),
            "Trained log-odds model"
        );

        Self {
            initial: initial.log_odds(),
            features,
            trained_on,
        }
    }

    pub fn initial_log_odds(&self) -> f64 {
        self.initial
    }

    /// The learned contribution of `feature`, if it was seen during training.
    pub fn feature_log_odds(&self, feature: &Feature) -> Option<f64> {
        self.features.get(feature).copied()
    }

    /// Number of distinct features with a learned contribution.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Number of judged items the model was trained on.
    pub fn trained_on(&self) -> usize {
        self.trained_on
    }

    /// Raw log-odds for an already extracted feature set.
    pub fn log_odds(&self, features: &FeatureSet) -> f64 {
        features
            .iter()
            .filter_map(|feature| self.features.get(feature))
            .fold(self.initial, |sum, contribution| sum + contribution)
    }

    /// Raw log-odds that `item` will be liked. Unbounded; monotonic with probability.
    pub fn classify(&self, item: &Item, extractor: &FeatureExtractor) -> f64 {
        self.log_odds(&extractor.extract(item))
    }

    /// Probability that `item` will be liked.
    pub fn probability(&self, item: &Item, extractor: &FeatureExtractor) -> f64 {
        logistic(self.classify(item, extractor))
    }
}

impl Default for LogOddsModel {
    fn default() -> Self {
        Self::empty()
    }
}
