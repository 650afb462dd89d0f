// Controller task: owns the classifier and turns user commands into
// requests and view updates.
//
// The TUI never talks to the network. It sends `UserCommand`s here; the
// controller validates input, spawns one classification task per analysis,
// and pushes `UiUpdate`s back once the task reports its outcome.

use std::sync::Arc;

use moodlens_core::client::{self, AnalysisOutcome, Classifier};
use moodlens_core::protocol::AnalysisRequest;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::protocol::{BackendStatus, RenderedResults, TaskEvent, UiState, UiUpdate, UserCommand};

/// Shown when the user submits blank or whitespace-only text.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze";

/// User-facing message for a failed request: the failure detail plus a hint
/// to start the backend.
pub fn failure_message(detail: &str, base_url: &str) -> String {
    format!("Error: {detail}. Make sure the emotion API is running ({base_url}).")
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct Controller {
    classifier: Arc<dyn Classifier>,
    ui_tx: mpsc::Sender<UiUpdate>,
    /// Spawned tasks report back through a clone of this sender.
    task_tx: mpsc::Sender<TaskEvent>,
    current_task: Option<JoinHandle<()>>,
    /// Identifies the newest analysis. Outcomes carrying any other value
    /// come from superseded requests and are dropped.
    pub generation: u64,
    /// Last state this controller pushed to the view.
    phase: UiState,
}

impl Controller {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        ui_tx: mpsc::Sender<UiUpdate>,
        task_tx: mpsc::Sender<TaskEvent>,
    ) -> Self {
        Controller {
            classifier,
            ui_tx,
            task_tx,
            current_task: None,
            generation: 0,
            phase: UiState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.current_task.is_some()
    }

    pub fn phase(&self) -> UiState {
        self.phase
    }

    fn set_phase(&mut self, phase: UiState) {
        if self.phase != phase {
            debug!("View phase {:?} -> {:?} (gen: {})", self.phase, phase, self.generation);
        }
        self.phase = phase;
    }

    /// Abort the in-flight analysis, if any.
    pub fn cancel_task(&mut self) {
        if let Some(handle) = self.current_task.take() {
            handle.abort();
            info!("Cancelled in-flight analysis (gen: {})", self.generation);
        }
    }

    /// Validate the input and start one classification request.
    ///
    /// Returns `false` without touching the network when the trimmed text is
    /// empty. A request already in flight is superseded.
    pub async fn analyze(&mut self, text: &str, threshold: f64) -> bool {
        let text = text.trim();
        if text.is_empty() {
            info!("Rejected blank input");
            self.set_phase(UiState::Error);
            let _ = self
                .ui_tx
                .send(UiUpdate::Error(EMPTY_INPUT_MESSAGE.to_string()))
                .await;
            return false;
        }

        self.cancel_task();
        self.generation += 1;
        let generation = self.generation;

        let request = AnalysisRequest {
            text: text.to_string(),
            threshold: threshold.clamp(0.0, 1.0),
        };

        self.set_phase(UiState::Loading);
        let _ = self.ui_tx.send(UiUpdate::Loading).await;

        let classifier = Arc::clone(&self.classifier);
        let tx = self.task_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = client::analyze(classifier.as_ref(), &request).await;
            let _ = tx.send(TaskEvent::Analysis { generation, outcome }).await;
        });
        self.current_task = Some(handle);

        info!(
            "Started analysis (gen: {}, {} chars, threshold {:.2})",
            generation,
            text.chars().count(),
            threshold
        );
        true
    }

    /// Apply the outcome of an analysis task.
    ///
    /// The view leaves Loading before the outcome-specific update is sent,
    /// so submit is re-enabled on every path.
    pub async fn handle_outcome(&mut self, generation: u64, outcome: AnalysisOutcome) {
        if generation != self.generation {
            debug!(
                "Discarding stale analysis outcome (event gen: {}, current gen: {})",
                generation, self.generation
            );
            return;
        }

        self.current_task = None;
        self.set_phase(UiState::Idle);
        let _ = self.ui_tx.send(UiUpdate::RequestSettled).await;

        match outcome {
            AnalysisOutcome::Success(response) => {
                info!("Analysis complete: {} emotions", response.emotions.len());
                let rendered = RenderedResults::from_response(&response);
                self.set_phase(UiState::Results);
                let _ = self.ui_tx.send(UiUpdate::Results(Box::new(rendered))).await;
            }
            AnalysisOutcome::Failure { detail } => {
                warn!("Analysis failed: {}", detail);
                let message = failure_message(&detail, self.classifier.base_url());
                self.set_phase(UiState::Error);
                let _ = self.ui_tx.send(UiUpdate::Error(message)).await;
            }
        }
    }

    /// Query the service health endpoint in the background.
    pub fn check_health(&self) {
        let classifier = Arc::clone(&self.classifier);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let status = fetch_backend_status(classifier.as_ref()).await;
            let _ = tx.send(TaskEvent::Health(status)).await;
        });
    }
}

/// Map a health check into a `BackendStatus`.
pub async fn fetch_backend_status(classifier: &dyn Classifier) -> BackendStatus {
    match classifier.health().await {
        Ok(health) if health.is_healthy() => BackendStatus::Online {
            model: health.model,
        },
        Ok(health) => BackendStatus::Offline {
            reason: format!("status `{}`, ready={}", health.status, health.ready),
        },
        Err(e) => BackendStatus::Offline {
            reason: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the controller until the TUI quits or its command channel closes.
///
/// Fires one health check at startup, then listens for user commands and
/// task completions.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut task_rx: mpsc::Receiver<TaskEvent>,
    mut controller: Controller,
) -> anyhow::Result<()> {
    info!("Controller loop started");
    controller.check_health();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Analyze { text, threshold }) => {
                        controller.analyze(&text, threshold).await;
                    }
                    Some(UserCommand::CheckHealth) => {
                        controller.check_health();
                    }
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = task_rx.recv() => {
                match event {
                    Some(TaskEvent::Analysis { generation, outcome }) => {
                        controller.handle_outcome(generation, outcome).await;
                    }
                    Some(TaskEvent::Health(status)) => {
                        match &status {
                            BackendStatus::Online { model } => {
                                info!("Backend online (model: {})", model.as_deref().unwrap_or("unknown"));
                            }
                            BackendStatus::Offline { reason } => warn!("Backend offline: {}", reason),
                            BackendStatus::Unknown => {}
                        }
                        let _ = controller.ui_tx.send(UiUpdate::Backend(status)).await;
                    }
                    // The controller holds a sender, so this only happens
                    // if every clone was dropped mid-shutdown.
                    None => break,
                }
            }
        }
    }

    if controller.is_loading() {
        info!("Exiting with analysis in flight (phase: {:?})", controller.phase());
    }
    controller.cancel_task();
    info!("Controller loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
