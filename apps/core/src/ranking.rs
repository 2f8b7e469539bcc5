//! Score refresh and top-N selection for the presentation layer.

use std::cmp::Ordering;
use tracing::{info, warn};

use crate::actors::traits::ItemScorer;
use crate::models::{Item, RankedPage};

/// Re-scores every unjudged item in place and returns how many failed.
///
/// A failed item is scored `0.0` ("no preference") and scoring carries on.
/// Once the scorer reports it has stopped, the remaining items are zeroed
/// without asking it again.
pub async fn refresh_scores<S>(scorer: &S, items: &mut [Item]) -> usize
where
    S: ItemScorer + ?Sized,
{
    let mut scored = 0;
    let mut failures = 0;
    let mut stopped = false;
    for item in items.iter_mut().filter(|item| !item.is_judged()) {
        let score = if stopped {
            failures += 1;
            0.0
        } else {
            match scorer.classify(item).await {
                Ok(score) => {
                    scored += 1;
                    score
                }
                Err(e) if e.is_stopped() => {
                    warn!(guid = %item.guid, "Scorer stopped, zeroing remaining items: {}", e);
                    stopped = true;
                    failures += 1;
                    0.0
                }
                Err(e) => {
                    warn!(guid = %item.guid, "Scoring item failed, treating as zero: {}", e);
                    failures += 1;
                    0.0
                }
            }
        };
        item.score = score;
    }
    info!(scored, failures, stopped, "Refreshed scores");
    failures
}

/// Keeps the `max_items` highest-scoring unjudged items, best first.
///
/// Ties keep their input order.
pub fn rank(items: Vec<Item>, max_items: usize) -> RankedPage {
    let mut candidates: Vec<Item> = items.into_iter().filter(|item| !item.is_judged()).collect();
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let total = candidates.len();
    candidates.truncate(max_items);
    RankedPage {
        shown: candidates.len(),
        elided: total - candidates.len(),
        items: candidates,
    }
}
