//! Log-Odds Model Tests

use crate::features::{Feature, FeatureExtractor, FeatureSet};
use crate::model::{logistic, LogOddsModel};
use crate::models::Item;

const EPSILON: f64 = 1e-12;

fn word(feed: &str, word: &str) -> Feature {
    Feature::Word {
        feed: feed.to_string(),
        word: word.to_string(),
    }
}

fn corpus() -> Vec<Item> {
    vec![
        Item::new("hn", "1", "Rust in production").judged(true),
        Item::new("hn", "2", "Java enterprise patterns").judged(false),
    ]
}

#[test]
fn test_one_liked_one_disliked() {
    let extractor = FeatureExtractor::new(false);
    let model = LogOddsModel::train(&corpus(), &extractor);

    assert_eq!(model.trained_on(), 2);
    assert!(model.initial_log_odds().abs() < EPSILON);
    assert!(model.feature_log_odds(&Feature::Feed("hn".to_string())).unwrap().abs() < EPSILON);

    let rust = model.feature_log_odds(&word("hn", "rust")).unwrap();
    let java = model.feature_log_odds(&word("hn", "java")).unwrap();
    assert!((rust - 2.0_f64.ln()).abs() < EPSILON);
    assert!((java + 2.0_f64.ln()).abs() < EPSILON);

    let liked_like = Item::new("hn", "3", "Rust tips");
    let disliked_like = Item::new("hn", "4", "Java news");
    assert!(model.classify(&liked_like, &extractor) > 0.0);
    assert!(model.classify(&disliked_like, &extractor) < 0.0);
}

#[test]
fn test_disjoint_liked_and_disliked_items() {
    let extractor = FeatureExtractor::new(false);
    let liked = Item::new("hn", "1", "Rust compilers").judged(true);
    let disliked = Item::new("lobsters", "2", "Java enterprise").judged(false);
    let model = LogOddsModel::train([&liked, &disliked], &extractor);

    assert!(model.initial_log_odds().abs() < EPSILON);
    assert!(model.feature_log_odds(&Feature::Feed("hn".to_string())).unwrap() > 0.0);
    assert!(model.feature_log_odds(&Feature::Feed("lobsters".to_string())).unwrap() < 0.0);
    assert!(model.classify(&liked, &extractor) > 0.0);
    assert!(model.classify(&disliked, &extractor) < 0.0);
    assert!((model.classify(&liked, &extractor) - 3.0 * 2.0_f64.ln()).abs() < EPSILON);
}

#[test]
fn test_unjudged_items_are_ignored() {
    let extractor = FeatureExtractor::new(false);
    let mut items = corpus();
    items.push(Item::new("hn", "3", "Rust rust rust"));

    let with_unjudged = LogOddsModel::train(&items, &extractor);
    let without = LogOddsModel::train(&corpus(), &extractor);

    assert_eq!(with_unjudged, without);
}

#[test]
fn test_training_is_idempotent() {
    let extractor = FeatureExtractor::default();
    let first = LogOddsModel::train(&corpus(), &extractor);
    let second = LogOddsModel::train(&corpus(), &extractor);

    assert_eq!(first, second);
}

#[test]
fn test_unseen_features_contribute_nothing() {
    let extractor = FeatureExtractor::new(false);
    let model = LogOddsModel::train(&corpus(), &extractor);

    let unseen = Item::new("lobsters", "5", "Completely novel words");
    assert!((model.classify(&unseen, &extractor) - model.initial_log_odds()).abs() < EPSILON);
    assert!(model.log_odds(&FeatureSet::new()).abs() < EPSILON);
}

#[test]
fn test_word_contributions_are_per_feed() {
    let extractor = FeatureExtractor::new(false);
    let model = LogOddsModel::train(&corpus(), &extractor);

    assert!(model.feature_log_odds(&word("hn", "rust")).is_some());
    assert!(model.feature_log_odds(&word("lobsters", "rust")).is_none());
}

#[test]
fn test_skewed_corpus_shifts_initial_log_odds() {
    let extractor = FeatureExtractor::new(false);
    let items = vec![
        Item::new("hn", "1", "a").judged(true),
        Item::new("hn", "2", "b").judged(true),
        Item::new("hn", "3", "c").judged(true),
    ];
    let model = LogOddsModel::train(&items, &extractor);

    assert!((model.initial_log_odds() - 4.0_f64.ln()).abs() < EPSILON);
    assert!(model.probability(&Item::new("hn", "4", "z"), &extractor) > 0.5);
}

#[test]
fn test_empty_model_scores_even() {
    let extractor = FeatureExtractor::default();
    let model = LogOddsModel::empty();

    assert_eq!(model.trained_on(), 0);
    assert_eq!(model.feature_count(), 0);
    assert_eq!(model.classify(&Item::new("hn", "1", "anything"), &extractor), 0.0);
    assert_eq!(logistic(0.0), 0.5);
}
