use crate::actors::messages::{ActorError, AppError, ScoreRequest, ScorerState};
use crate::artifact::StagedArtifact;
use crate::config::ScorerConfig;
use crate::protocol::{encode_request, parse_response, ProtocolError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

// --- Constants ---
const PREDICT_MODE: &str = "predict-prob";
const STDIO_PLACEHOLDER: &str = "-";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;
type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// How the predictor process ended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExitOutcome {
    Success,
    Failed(String),
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Success => f.write_str("exited successfully"),
            ExitOutcome::Failed(reason) => f.write_str(reason),
        }
    }
}

/// A handle to the process-backed scorer.
///
/// This provides a public, cloneable interface for sending scoring requests to the
/// serving loop that owns the predictor process. Any number of callers may use
/// clones of the handle concurrently; the loop serves their requests one at a time.
#[derive(Clone)]
pub struct ProcessScorerHandle {
    sender: mpsc::Sender<ScoreRequest>,
    state: watch::Receiver<ScorerState>,
    lifecycle: Arc<Lifecycle>,
    request_timeout: Duration,
}

struct Lifecycle {
    quit: Mutex<Option<oneshot::Sender<()>>>,
    runner: Mutex<Option<JoinHandle<Result<(), AppError>>>>,
}

impl ProcessScorerHandle {
    /// Launches the predictor on a staged model and starts the serving loop.
    ///
    /// Setup failures (missing executable, spawn or pipe errors) are returned
    /// here and leave no process running.
    ///
    /// # Arguments
    ///
    /// * `config` - Predictor executable, mailbox capacity and request timeout.
    /// * `artifact` - The staged model; the serving loop keeps it alive until teardown.
    pub async fn start(config: &ScorerConfig, artifact: StagedArtifact) -> Result<Self, AppError> {
        let program = resolve_predictor(&config.predictor_bin)?;
        let pipe = PredictorPipe::launch(&program, artifact)?;
        Ok(Self::spawn(
            pipe,
            config.mailbox_capacity,
            config.request_timeout(),
        ))
    }

    /// Starts a serving loop over an already connected predictor.
    pub(crate) fn spawn(pipe: PredictorPipe, mailbox: usize, request_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(mailbox.max(1));
        let (quit_tx, quit_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(ScorerState::Created);

        let runner = ProcessScorerRunner {
            receiver,
            quit: quit_rx,
            state: state_tx,
            pipe: Some(pipe),
        };
        let join = tokio::spawn(async move { runner.run().await });

        Self {
            sender,
            state: state_rx,
            lifecycle: Arc::new(Lifecycle {
                quit: Mutex::new(Some(quit_tx)),
                runner: Mutex::new(Some(join)),
            }),
            request_timeout,
        }
    }

    pub fn state(&self) -> ScorerState {
        *self.state.borrow()
    }

    /// Scores one classifiable string, waiting for the serving loop's reply.
    ///
    /// Fails immediately once the scorer is stopped instead of blocking.
    /// Waiting for mailbox space and for the reply share one deadline.
    pub async fn classify(&self, text: &str) -> Result<f64, AppError> {
        if self.state() == ScorerState::Stopped {
            return Err(ActorError::Stopped.into());
        }

        let (send, recv) = oneshot::channel();
        let request = ScoreRequest {
            text: text.to_string(),
            responder: send,
        };

        timeout(self.request_timeout, async {
            self.sender
                .send(request)
                .await
                .map_err(|_| AppError::Actor(ActorError::Stopped))?;
            recv.await.map_err(|_| AppError::Actor(ActorError::Stopped))?
        })
        .await?
    }

    /// Shuts the scorer down and waits for the predictor to exit.
    ///
    /// Returns the error that ended the serving loop, if any. Concurrent callers
    /// all wait for the predictor to exit; calling it again afterwards is a no-op.
    pub async fn stop(&self) -> Result<(), AppError> {
        if let Some(quit) = self.lifecycle.quit.lock().await.take() {
            let _ = quit.send(());
        }

        // Held across the join so a second stopper waits for the first.
        let mut runner = self.lifecycle.runner.lock().await;
        match runner.take() {
            Some(join) => join.await?,
            None => Ok(()),
        }
    }
}

/// Resolves the predictor executable, looking bare names up on `PATH`.
fn resolve_predictor(bin: &str) -> Result<PathBuf, AppError> {
    let program = which::which(bin)?;
    debug!("Resolved predictor {:?} to {:?}", bin, program);
    Ok(program)
}

/// The predictor's pipes plus the means to wait for and terminate it.
///
/// Owned by exactly one serving loop; consumed by [`PredictorPipe::shutdown`]
/// or [`PredictorPipe::abort`], so teardown runs once.
pub(crate) struct PredictorPipe {
    stdin: Option<BoxedWriter>,
    stdout: Lines<BufReader<BoxedReader>>,
    exit: watch::Receiver<Option<ExitOutcome>>,
    kill: Option<oneshot::Sender<()>>,
    _artifact: Option<StagedArtifact>,
}

impl PredictorPipe {
    /// Spawns `<program> predict-prob <model> -` with all three streams piped.
    #[instrument(skip(artifact), fields(model = ?artifact.path()))]
    pub(crate) fn launch(program: &Path, artifact: StagedArtifact) -> Result<Self, AppError> {
        info!("Starting predictor {:?}", program);

        // kill_on_drop: any early return below must not leave the child running.
        let mut child = Command::new(program)
            .arg(PREDICT_MODE)
            .arg(artifact.path())
            .arg(STDIO_PLACEHOLDER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Setup(format!("Starting predictor: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Setup("Creating stdin pipe to predictor".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Setup("Creating stdout pipe to predictor".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Setup("Creating stderr pipe to predictor".to_string()))?;

        tokio::spawn(drain_stderr(stderr));

        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = oneshot::channel();
        tokio::spawn(supervise(child, kill_rx, exit_tx));

        Ok(Self::from_parts(
            Box::new(stdin),
            Box::new(stdout),
            exit_rx,
            Some(kill_tx),
            Some(artifact),
        ))
    }

    /// Assembles a pipe from arbitrary streams and an exit signal.
    pub(crate) fn from_parts(
        stdin: BoxedWriter,
        stdout: BoxedReader,
        exit: watch::Receiver<Option<ExitOutcome>>,
        kill: Option<oneshot::Sender<()>>,
        artifact: Option<StagedArtifact>,
    ) -> Self {
        Self {
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
            exit,
            kill,
            _artifact: artifact,
        }
    }

    /// Writes one request line and reads exactly one response line.
    ///
    /// Both halves race against the predictor exiting so a dead predictor
    /// fails the request instead of hanging it.
    async fn exchange(&mut self, text: &str) -> Result<f64, AppError> {
        let line = encode_request(text);
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ActorError::Internal("Predictor input already closed".to_string()))?;

        tokio::select! {
            biased;
            outcome = wait_exit(&mut self.exit) => {
                return Err(ActorError::ProcessExited(outcome.to_string()).into());
            }
            written = write_line(stdin, &line) => {
                written.map_err(|e| AppError::Io(std::io::Error::new(e.kind(), format!("Sending item to predictor: {}", e))))?;
            }
        }

        let response = tokio::select! {
            biased;
            line = self.stdout.next_line() => {
                line.map_err(|e| AppError::Io(std::io::Error::new(e.kind(), format!("Reading predictor response: {}", e))))?
            }
            outcome = wait_exit(&mut self.exit) => {
                return Err(ActorError::ProcessExited(outcome.to_string()).into());
            }
        };

        let response = response.ok_or(ProtocolError::UnexpectedEof)?;
        debug!(request = %line.trim_end(), %response, "Predictor answered");
        Ok(parse_response(&response)?)
    }

    /// Orderly teardown: close the predictor's input, then wait for it to exit.
    async fn shutdown(mut self) -> Result<(), AppError> {
        drop(self.stdin.take());

        let outcome = match timeout(SHUTDOWN_GRACE, wait_exit(&mut self.exit)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Predictor ignored end of input for {:?}, killing it", SHUTDOWN_GRACE);
                self.abort().await;
                return Err(ActorError::Timeout("Predictor did not exit after its input closed".to_string()).into());
            }
        };

        match outcome {
            ExitOutcome::Success => Ok(()),
            ExitOutcome::Failed(reason) => Err(ActorError::ProcessExited(reason).into()),
        }
    }

    /// Failure teardown: kill the predictor and wait for it to be reaped.
    async fn abort(mut self) {
        drop(self.stdin.take());
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
        let outcome = wait_exit(&mut self.exit).await;
        debug!(%outcome, "Predictor torn down");
    }
}

async fn write_line(stdin: &mut BoxedWriter, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.flush().await
}

/// Resolves once the predictor has exited. A vanished supervisor counts as an exit.
async fn wait_exit(exit: &mut watch::Receiver<Option<ExitOutcome>>) -> ExitOutcome {
    match exit.wait_for(Option::is_some).await {
        Ok(outcome) => outcome
            .clone()
            .unwrap_or_else(|| ExitOutcome::Failed("exit status unavailable".to_string())),
        Err(_) => ExitOutcome::Failed("predictor supervisor went away".to_string()),
    }
}

/// Owns the child: reports its exit, or kills it when asked (or when the pipe is dropped).
async fn supervise(
    mut child: Child,
    kill: oneshot::Receiver<()>,
    exit: watch::Sender<Option<ExitOutcome>>,
) {
    debug!("Waiting for predictor to exit...");
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill => {
            if let Err(e) = child.start_kill() {
                warn!("Failed to kill predictor: {}", e);
            }
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) if status.success() => ExitOutcome::Success,
        Ok(status) => ExitOutcome::Failed(format!("predictor {}", status)),
        Err(e) => ExitOutcome::Failed(format!("waiting for predictor: {}", e)),
    };
    info!(%outcome, "Predictor exited");
    let _ = exit.send(Some(outcome));
}

/// Logs the predictor's diagnostics; never used for control flow.
async fn drain_stderr(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => warn!(target: "predictor", "{}", line),
            Ok(None) => {
                debug!("Predictor stderr: EOF");
                break;
            }
            Err(e) => {
                warn!("Scanning predictor stderr: {}", e);
                break;
            }
        }
    }
}

// --- Actor Runner (Internal Logic) ---
struct ProcessScorerRunner {
    receiver: mpsc::Receiver<ScoreRequest>,
    quit: oneshot::Receiver<()>,
    state: watch::Sender<ScorerState>,
    pipe: Option<PredictorPipe>,
}

enum LoopExit {
    Quit,
    Abandoned,
    Failed(AppError),
}

impl ProcessScorerRunner {
    async fn run(mut self) -> Result<(), AppError> {
        self.state.send_replace(ScorerState::Serving);
        info!("Process scorer started");

        let exit = self.serve().await;

        // Nothing new gets in; whatever is queued fails with the loop.
        self.receiver.close();
        let queued_failure = match &exit {
            LoopExit::Failed(e) => e.clone(),
            LoopExit::Quit | LoopExit::Abandoned => ActorError::Stopped.into(),
        };
        let mut failed = 0;
        while let Some(request) = self.receiver.recv().await {
            let _ = request.responder.send(Err(queued_failure.clone()));
            failed += 1;
        }
        if failed > 0 {
            warn!(failed, "Failed requests still queued at shutdown");
        }

        let result = match (exit, self.pipe.take()) {
            (LoopExit::Failed(e), pipe) => {
                error!("Process scorer failed: {}", e);
                if let Some(pipe) = pipe {
                    pipe.abort().await;
                }
                Err(e)
            }
            (_, Some(pipe)) => pipe.shutdown().await,
            (_, None) => Ok(()),
        };

        self.state.send_replace(ScorerState::Stopped);
        info!("Process scorer stopped");
        result
    }

    /// Serves requests one at a time until quit, abandonment, or a fatal error.
    async fn serve(&mut self) -> LoopExit {
        let Some(pipe) = self.pipe.as_mut() else {
            return LoopExit::Failed(ActorError::Internal("Serving without a predictor".to_string()).into());
        };

        loop {
            debug!("Process scorer waiting for input...");
            tokio::select! {
                biased;
                outcome = wait_exit(&mut pipe.exit) => {
                    return LoopExit::Failed(ActorError::ProcessExited(format!("closed unexpectedly ({})", outcome)).into());
                }
                _ = &mut self.quit => return LoopExit::Quit,
                request = self.receiver.recv() => {
                    let Some(ScoreRequest { text, responder }) = request else {
                        return LoopExit::Abandoned;
                    };
                    match pipe.exchange(&text).await {
                        Ok(probability) => {
                            // The caller may have timed out; the exchange still completed.
                            let _ = responder.send(Ok(probability));
                        }
                        Err(e) => {
                            let _ = responder.send(Err(e.clone()));
                            return LoopExit::Failed(e);
                        }
                    }
                }
            }
        }
    }
}
