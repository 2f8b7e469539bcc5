//! In-process statistical scoring.
//!
//! A Naive-Bayes style log-odds model trained from judged items. Once built a
//! model is immutable; retraining produces a new instance.

pub mod log_odds;

pub use log_odds::{logistic, Counts, LogOddsModel};
