//! Test Module
//!
//! Test suite for the feed scoring core.
//!
//! ## Test Categories
//! - `features_tests`: Tokenization and feed/word feature extraction
//! - `model_tests`: Log-odds training and classification
//! - `process_tests`: Process-backed scorer serving loop, fake and real predictors
//! - `scorer_tests`: Backend selection, retraining, model staging
//! - `config_tests`: Environment configuration and validation
//! - `ranking_tests`: Score refresh and top-N selection
//! - `training_tests`: Training data rendering and the test split

pub mod model_tests;
pub mod config_tests;
pub mod training_tests;
