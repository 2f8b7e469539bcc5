//! Line protocol spoken with the external predictor.
//!
//! One request line in, one response line out, strictly alternating. A
//! response carries the predicted label and the predictor's confidence in
//! that label, e.g. `__label__1 0.998`.

use std::fmt;
use thiserror::Error;

pub const LIKED_LABEL: &str = "__label__1";
pub const DISLIKED_LABEL: &str = "__label__0";

/// Violations of the predictor's line protocol. All of them are fatal to the serving loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    /// The response named a label other than `__label__0` / `__label__1`.
    #[error("predictor returned unknown label: {0:?}")]
    UnknownLabel(String),
    /// The response line could not be parsed.
    #[error("malformed predictor response {line:?}: {reason}")]
    Malformed { line: String, reason: String },
    /// The predictor closed its output before answering.
    #[error("predictor output ended before a response was read")]
    UnexpectedEof,
}

/// The two classes the predictor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Liked,
    Disliked,
}

impl Label {
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        match token {
            LIKED_LABEL => Ok(Label::Liked),
            DISLIKED_LABEL => Ok(Label::Disliked),
            other => Err(ProtocolError::UnknownLabel(other.to_string())),
        }
    }

    pub fn from_judgement(liked: bool) -> Self {
        if liked {
            Label::Liked
        } else {
            Label::Disliked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Liked => LIKED_LABEL,
            Label::Disliked => DISLIKED_LABEL,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed response line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Confidence in `label`, clamped into `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    /// Parses `<label> <probability>`. Trailing tokens are ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let malformed = |reason: &str| ProtocolError::Malformed {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = line.split_whitespace();
        let label_token = tokens.next().ok_or_else(|| malformed("empty line"))?;
        let prob_token = tokens
            .next()
            .ok_or_else(|| malformed("missing probability"))?;

        let label = Label::parse(label_token)?;
        let confidence: f64 = prob_token
            .parse()
            .map_err(|e: std::num::ParseFloatError| malformed(&e.to_string()))?;
        if !confidence.is_finite() {
            return Err(malformed("probability is not finite"));
        }

        Ok(Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }

    /// Probability that the item will be liked.
    ///
    /// The predictor reports confidence in its own predicted class, so a
    /// disliked prediction is inverted.
    pub fn liked_probability(&self) -> f64 {
        match self.label {
            Label::Liked => self.confidence,
            Label::Disliked => 1.0 - self.confidence,
        }
    }
}

/// Parses a response line straight into the probability of "liked".
pub fn parse_response(line: &str) -> Result<f64, ProtocolError> {
    Prediction::parse(line).map(|prediction| prediction.liked_probability())
}

/// Renders a request line, newline-terminated.
///
/// Embedded line breaks are flattened to spaces: the predictor answers once
/// per line, so a stray newline would desynchronise requests and responses.
pub fn encode_request(text: &str) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    line.push('\n');
    line
}

/// Renders a training line: `__label__<0|1> <text>`.
pub fn encode_training_line(liked: bool, text: &str) -> String {
    encode_request(&format!("{} {}", Label::from_judgement(liked), text))
}
