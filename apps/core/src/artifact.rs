//! Model artifact staging.
//!
//! The predictor is started with a path to its trained model. The model
//! either already sits at the configured path or is fetched once from a URL
//! into a scratch directory. A missing artifact is not an error: callers
//! fall back to the zero scorer.

use futures::StreamExt;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};
use url::Url;

use crate::config::ScorerConfig;
use crate::error::AppError;

const STAGED_MODEL_FILENAME: &str = "model.bin";

/// A model artifact ready to hand to the predictor.
///
/// Artifacts fetched from a URL own their scratch directory; it is removed
/// when the artifact is dropped.
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    scratch: Option<TempDir>,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact lives in a scratch directory owned by this value.
    pub fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }
}

/// Stages the configured model artifact, returning `None` when there is none.
pub async fn stage(config: &ScorerConfig) -> Result<Option<StagedArtifact>, AppError> {
    match &config.model_url {
        Some(url) => fetch(url).await,
        None => Ok(locate(&config.model_path)),
    }
}

/// Uses a model that already exists on disk.
pub fn locate(path: &Path) -> Option<StagedArtifact> {
    if path.is_file() {
        Some(StagedArtifact {
            path: path.to_path_buf(),
            scratch: None,
        })
    } else {
        info!("No model artifact at {:?}", path);
        None
    }
}

/// Downloads a model into a fresh scratch directory. A 404 means "no model".
///
/// Transport failures surface as [`AppError::Io`]; any other unsuccessful
/// status is a setup error.
#[instrument]
pub async fn fetch(url: &Url) -> Result<Option<StagedArtifact>, AppError> {
    let scratch = tempfile::Builder::new()
        .prefix("classifier")
        .tempdir()
        .map_err(|e| AppError::Setup(format!("Creating classifier scratch directory: {}", e)))?;
    let path = scratch.path().join(STAGED_MODEL_FILENAME);

    info!("Staging model artifact from {}", url);
    let res = reqwest::get(url.clone()).await?;

    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        info!("No model artifact at {}", url);
        return Ok(None);
    }
    if !status.is_success() {
        return Err(AppError::Setup(format!(
            "Fetching model artifact failed with status {}",
            status
        )));
    }

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Setup(format!("Creating staged model file: {}", e)))?;
    let mut stream = res.bytes_stream();
    let mut staged: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Setup(format!("Writing staged model file: {}", e)))?;
        staged += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| AppError::Setup(format!("Writing staged model file: {}", e)))?;

    info!(bytes = staged, "Staged model artifact at {:?}", path);
    Ok(Some(StagedArtifact {
        path,
        scratch: Some(scratch),
    }))
}
