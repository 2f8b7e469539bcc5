use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ActorError {
    /// The serving loop is no longer accepting requests.
    #[error("Scorer is stopped")]
    Stopped,
    /// The predictor process exited while the scorer was serving.
    #[error("Predictor process exited: {0}")]
    ProcessExited(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(err.to_string())
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Lifecycle of the process-backed scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerState {
    /// Constructed; the serving loop has not picked up work yet.
    Created,
    /// The serving loop is running and accepting requests.
    Serving,
    /// Shut down, either on request or after a fatal error. Terminal.
    Stopped,
}

/// One scoring request sent to the process-backed scorer's serving loop.
///
/// Consumed exactly once by the loop; the reply slot is written at most once.
#[derive(Debug)]
pub struct ScoreRequest {
    /// The classifiable string to score.
    pub text: String,
    /// A channel to send the probability (or the failure) back.
    pub responder: oneshot::Sender<Result<f64, AppError>>,
}
