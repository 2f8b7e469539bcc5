//! The scoring facade.
//!
//! [`Scorer`] is the one thing the rest of the system talks to. Exactly one of
//! three backends sits behind it, chosen once at startup:
//!
//! - **Process**: a long-lived external predictor, see [`ProcessScorerHandle`].
//! - **Statistical**: the in-process [`LogOddsModel`], converted to a probability.
//! - **Zero**: always `0.0`, used whenever no trained model is available.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::actors::messages::AppError;
use crate::actors::process::ProcessScorerHandle;
use crate::actors::traits::ItemScorer;
use crate::artifact;
use crate::config::{BackendKind, ScorerConfig};
use crate::features::{classifiable_string, FeatureExtractor};
use crate::model::{logistic, LogOddsModel};
use crate::models::Item;

/// Statistical backend: a shared, swappable log-odds model.
///
/// Readers hold the read lock for one scoring call; [`StatisticalScorer::retrain`]
/// builds the replacement off to the side and only takes the write lock to swap it in.
#[derive(Clone)]
pub struct StatisticalScorer {
    model: Arc<RwLock<Arc<LogOddsModel>>>,
    extractor: Arc<FeatureExtractor>,
}

impl StatisticalScorer {
    pub fn new(model: LogOddsModel, extractor: FeatureExtractor) -> Self {
        Self {
            model: Arc::new(RwLock::new(Arc::new(model))),
            extractor: Arc::new(extractor),
        }
    }

    /// Trains a model on the judged items in `items`.
    pub fn train(items: &[Item], extractor: FeatureExtractor) -> Self {
        let model = LogOddsModel::train(items, &extractor);
        Self::new(model, extractor)
    }

    /// The model currently in use.
    pub async fn model(&self) -> Arc<LogOddsModel> {
        Arc::clone(&*self.model.read().await)
    }

    /// Raw log-odds that `item` will be liked.
    pub async fn log_odds(&self, item: &Item) -> f64 {
        let model = self.model.read().await;
        model.classify(item, &self.extractor)
    }

    /// Probability that `item` will be liked.
    pub async fn probability(&self, item: &Item) -> f64 {
        logistic(self.log_odds(item).await)
    }

    /// Builds a new model from `items` and swaps it in.
    pub async fn retrain(&self, items: &[Item]) {
        let fresh = Arc::new(LogOddsModel::train(items, &self.extractor));
        *self.model.write().await = fresh;
    }
}

/// The uniform scoring interface.
#[derive(Clone)]
pub enum Scorer {
    Process(ProcessScorerHandle),
    Statistical(StatisticalScorer),
    Zero,
}

impl Scorer {
    /// Brings up the configured backend.
    ///
    /// A missing model artifact (or, for the statistical backend, no judged
    /// items) degrades to [`Scorer::Zero`] rather than failing.
    pub async fn start(config: &ScorerConfig, items: &[Item]) -> Result<Self, AppError> {
        match config.backend {
            BackendKind::Zero => Ok(Scorer::Zero),
            BackendKind::Statistical => {
                if !items.iter().any(Item::is_judged) {
                    info!("No judged items to train on, scoring everything zero");
                    return Ok(Scorer::Zero);
                }
                let extractor = FeatureExtractor::new(config.stemming);
                Ok(Scorer::Statistical(StatisticalScorer::train(items, extractor)))
            }
            BackendKind::Process => match artifact::stage(config).await? {
                Some(staged) => Ok(Scorer::Process(
                    ProcessScorerHandle::start(config, staged).await?,
                )),
                None => {
                    info!("No trained model available, scoring everything zero");
                    Ok(Scorer::Zero)
                }
            },
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Scorer::Process(_) => BackendKind::Process,
            Scorer::Statistical(_) => BackendKind::Statistical,
            Scorer::Zero => BackendKind::Zero,
        }
    }

    /// Probability in `[0, 1]` that `item` will be liked.
    pub async fn classify(&self, item: &Item) -> Result<f64, AppError> {
        match self {
            Scorer::Process(handle) => handle.classify(&classifiable_string(item)).await,
            Scorer::Statistical(statistical) => Ok(statistical.probability(item).await),
            Scorer::Zero => Ok(0.0),
        }
    }

    /// Stops the active backend. Only the process backend has anything to tear down.
    pub async fn stop(&self) -> Result<(), AppError> {
        match self {
            Scorer::Process(handle) => handle.stop().await,
            Scorer::Statistical(_) | Scorer::Zero => Ok(()),
        }
    }
}

#[async_trait]
impl ItemScorer for Scorer {
    async fn classify(&self, item: &Item) -> Result<f64, AppError> {
        Scorer::classify(self, item).await
    }
}
