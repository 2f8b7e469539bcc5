//! Configuration Tests
//!
//! Environment parsing and validation. `temp_env` restores the environment
//! after each closure, so these tests do not leak settings into each other.

use crate::config::*;
use crate::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

const ALL_VARS: [&str; 8] = [
    ENV_BACKEND,
    ENV_MODEL_PATH,
    ENV_MODEL_URL,
    ENV_PREDICTOR_BIN,
    ENV_STEMMING,
    ENV_MAILBOX,
    ENV_REQUEST_TIMEOUT_SECS,
    ENV_MAX_ITEMS,
];

#[test]
fn test_defaults_when_unset() {
    temp_env::with_vars_unset(ALL_VARS, || {
        let config = ScorerConfig::from_env().unwrap();

        assert_eq!(config.backend, BackendKind::Process);
        assert_eq!(config.model_path, PathBuf::from("model.bin"));
        assert!(config.model_url.is_none());
        assert_eq!(config.predictor_bin, "fasttext");
        assert!(config.stemming);
        assert_eq!(config.mailbox_capacity, 32);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_items, 3);
    });
}

#[test]
fn test_overrides_from_env() {
    temp_env::with_vars(
        [
            (ENV_BACKEND, Some("Statistical")),
            (ENV_MODEL_PATH, Some("/var/lib/feedrank/model.bin")),
            (ENV_MODEL_URL, Some("https://models.example.com/feeds/model.bin")),
            (ENV_PREDICTOR_BIN, Some("/opt/fasttext/bin/fasttext")),
            (ENV_STEMMING, Some("false")),
            (ENV_MAILBOX, Some("8")),
            (ENV_REQUEST_TIMEOUT_SECS, Some(" 5 ")),
            (ENV_MAX_ITEMS, Some("10")),
        ],
        || {
            let config = ScorerConfig::from_env().unwrap();

            assert_eq!(config.backend, BackendKind::Statistical);
            assert_eq!(config.model_path, PathBuf::from("/var/lib/feedrank/model.bin"));
            assert_eq!(
                config.model_url.as_ref().map(|u| u.as_str()),
                Some("https://models.example.com/feeds/model.bin")
            );
            assert_eq!(config.predictor_bin, "/opt/fasttext/bin/fasttext");
            assert!(!config.stemming);
            assert_eq!(config.mailbox_capacity, 8);
            assert_eq!(config.request_timeout(), Duration::from_secs(5));
            assert_eq!(config.max_items, 10);
        },
    );
}

#[test]
fn test_blank_model_url_means_none() {
    temp_env::with_vars([(ENV_MODEL_URL, Some("  "))], || {
        assert!(ScorerConfig::from_env().unwrap().model_url.is_none());
    });
}

#[test]
fn test_unknown_backend_is_rejected() {
    temp_env::with_vars([(ENV_BACKEND, Some("neural"))], || {
        let err = ScorerConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains(ENV_BACKEND)));
    });
}

#[test]
fn test_unparsable_values_are_rejected() {
    for (name, value) in [
        (ENV_MAILBOX, "lots"),
        (ENV_STEMMING, "maybe"),
        (ENV_REQUEST_TIMEOUT_SECS, "-1"),
        (ENV_MODEL_URL, "not a url"),
    ] {
        temp_env::with_vars([(name, Some(value))], || {
            let err = ScorerConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{}={:?} gave {:?}", name, value, err);
        });
    }
}

#[test]
fn test_out_of_range_values_fail_validation() {
    for (name, value) in [
        (ENV_MAILBOX, "0"),
        (ENV_MAILBOX, "100000"),
        (ENV_REQUEST_TIMEOUT_SECS, "0"),
        (ENV_MAX_ITEMS, "0"),
        (ENV_PREDICTOR_BIN, ""),
    ] {
        temp_env::with_vars([(name, Some(value))], || {
            let err = ScorerConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{}={:?} gave {:?}", name, value, err);
        });
    }
}

#[test]
fn test_backend_kind_parsing() {
    assert_eq!("zero".parse::<BackendKind>().unwrap(), BackendKind::Zero);
    assert_eq!(" PROCESS ".parse::<BackendKind>().unwrap(), BackendKind::Process);
    assert!("".parse::<BackendKind>().is_err());
}
