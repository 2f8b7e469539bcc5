//! FeedRank core: scores feed headlines with the probability that a reader will like them.
//!
//! The entry point is [`Scorer`], a facade over three interchangeable backends:
//! a long-lived external predictor process, an in-process log-odds model, and
//! a zero fallback used when no trained model exists.

pub mod actors;
pub mod artifact;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod models;
pub mod protocol;
pub mod ranking;
pub mod scorer;
pub mod training;

#[cfg(test)]
mod tests;

pub use actors::messages::{ActorError, ScorerState};
pub use actors::process::ProcessScorerHandle;
pub use actors::traits::ItemScorer;
pub use config::{BackendKind, ScorerConfig};
pub use error::AppError;
pub use models::{Item, RankedPage};
pub use scorer::{Scorer, StatisticalScorer};
