//! # Features Module
//!
//! Turns an [`Item`](crate::models::Item) into the units the scoring backends consume.
//!
//! ## Components
//! - `tokenizer`: lower-casing, word splitting and optional English stemming
//! - `extractor`: classifiable strings and feature sets built from tokens

pub mod extractor;
pub mod tokenizer;

pub use extractor::{classifiable_string, Feature, FeatureExtractor, FeatureSet};
pub use tokenizer::Tokenizer;
