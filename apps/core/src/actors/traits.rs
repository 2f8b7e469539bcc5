use crate::actors::messages::AppError;
use crate::models::Item;
use async_trait::async_trait;

/// Defines the public interface shared by every scoring backend.
///
/// Callers only see a probability that an item will be liked; which backend
/// produces it is decided once, at startup.
#[async_trait]
pub trait ItemScorer: Send + Sync + 'static {
    /// Scores a single item.
    async fn classify(&self, item: &Item) -> Result<f64, AppError>;
}
