//! Scorer configuration read from the environment.
//!
//! The binary loads a `.env` file first (via `dotenv`), then every setting
//! falls back to a default when its variable is unset.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::error::AppError;

pub const ENV_BACKEND: &str = "FEEDRANK_BACKEND";
pub const ENV_MODEL_PATH: &str = "FEEDRANK_MODEL_PATH";
pub const ENV_MODEL_URL: &str = "FEEDRANK_MODEL_URL";
pub const ENV_PREDICTOR_BIN: &str = "FEEDRANK_PREDICTOR_BIN";
pub const ENV_STEMMING: &str = "FEEDRANK_STEMMING";
pub const ENV_MAILBOX: &str = "FEEDRANK_MAILBOX";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "FEEDRANK_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_ITEMS: &str = "FEEDRANK_MAX_ITEMS";

const DEFAULT_MODEL_PATH: &str = "model.bin";
const DEFAULT_PREDICTOR_BIN: &str = "fasttext";
const DEFAULT_MAILBOX: usize = 32;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_ITEMS: usize = 3;

/// Which scoring backend to bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Long-lived external predictor spoken to over pipes.
    Process,
    /// In-process log-odds model trained from judged items.
    Statistical,
    /// Always scores zero.
    Zero,
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(BackendKind::Process),
            "statistical" => Ok(BackendKind::Statistical),
            "zero" => Ok(BackendKind::Zero),
            other => Err(AppError::Config(format!(
                "{} must be one of process, statistical, zero (got {:?})",
                ENV_BACKEND, other
            ))),
        }
    }
}

/// Settings for the scoring subsystem.
#[derive(Debug, Clone, Validate)]
pub struct ScorerConfig {
    pub backend: BackendKind,
    /// Where the trained predictor model lives (or is staged to).
    pub model_path: PathBuf,
    /// Remote location to stage the model from, if any.
    pub model_url: Option<Url>,
    /// Predictor executable; bare names are looked up on `PATH`.
    #[validate(length(min = 1))]
    pub predictor_bin: String,
    /// Stem title words for the statistical backend.
    pub stemming: bool,
    /// Capacity of the serving loop's request mailbox.
    #[validate(range(min = 1, max = 4096))]
    pub mailbox_capacity: usize,
    /// How long a caller waits for one reply.
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,
    /// How many items a ranked page shows.
    #[validate(range(min = 1))]
    pub max_items: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Process,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_url: None,
            predictor_bin: DEFAULT_PREDICTOR_BIN.to_string(),
            stemming: true,
            mailbox_capacity: DEFAULT_MAILBOX,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl ScorerConfig {
    /// Reads the configuration from `FEEDRANK_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            backend: parse_var(ENV_BACKEND)?.unwrap_or(defaults.backend),
            model_path: env::var(ENV_MODEL_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            model_url: match env::var(ENV_MODEL_URL) {
                Ok(raw) if !raw.trim().is_empty() => Some(Url::parse(raw.trim())?),
                _ => None,
            },
            predictor_bin: env::var(ENV_PREDICTOR_BIN).unwrap_or(defaults.predictor_bin),
            stemming: parse_var(ENV_STEMMING)?.unwrap_or(defaults.stemming),
            mailbox_capacity: parse_var(ENV_MAILBOX)?.unwrap_or(defaults.mailbox_capacity),
            request_timeout_secs: parse_var(ENV_REQUEST_TIMEOUT_SECS)?
                .unwrap_or(defaults.request_timeout_secs),
            max_items: parse_var(ENV_MAX_ITEMS)?.unwrap_or(defaults.max_items),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} has invalid value {:?}: {}", name, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::Config(format!("{}: {}", name, e))),
    }
}
