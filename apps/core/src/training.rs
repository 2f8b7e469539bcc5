//! Training data artifact for the external training tool.
//!
//! One line per judged item, `__label__<0|1> <feed> <title>`. Every fifth line
//! is held out as test data.

use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::AppError;
use crate::features::classifiable_string;
use crate::models::Item;
use crate::protocol::encode_training_line;

pub const DATA_FILENAME: &str = "data";
pub const TRAINING_DATA_FILENAME: &str = "training-data";
pub const TEST_DATA_FILENAME: &str = "test-data";

const TEST_EVERY: usize = 5;

/// Rendered training lines, split for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingSet {
    /// Every labeled line.
    pub all: Vec<String>,
    /// Lines used to train the evaluation model.
    pub training: Vec<String>,
    /// Held-out lines (indices 0, 5, 10, ...).
    pub test: Vec<String>,
}

impl TrainingSet {
    /// Renders the judged items; unjudged ones are skipped.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut set = Self::default();
        let judged = items
            .into_iter()
            .filter_map(|item| item.judgement.map(|liked| (liked, item)));

        for (i, (liked, item)) in judged.enumerate() {
            let line = encode_training_line(liked, &classifiable_string(item));
            if i % TEST_EVERY == 0 {
                set.test.push(line.clone());
            } else {
                set.training.push(line.clone());
            }
            set.all.push(line);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Writes `data`, `training-data` and `test-data` into `dir`.
    pub async fn write_to_dir(&self, dir: &Path) -> Result<(), AppError> {
        tokio::fs::create_dir_all(dir).await?;
        write_lines(&dir.join(DATA_FILENAME), &self.all).await?;
        write_lines(&dir.join(TRAINING_DATA_FILENAME), &self.training).await?;
        write_lines(&dir.join(TEST_DATA_FILENAME), &self.test).await?;
        info!(
            lines = self.all.len(),
            test = self.test.len(),
            "Wrote training data to {:?}",
            dir
        );
        Ok(())
    }
}

async fn write_lines(path: &Path, lines: &[String]) -> Result<(), AppError> {
    let mut file = tokio::fs::File::create(path).await?;
    for line in lines {
        file.write_all(line.as_bytes()).await?;
    }
    file.flush().await?;
    Ok(())
}
