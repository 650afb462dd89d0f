// Messages exchanged between the TUI and the controller task.
//
// The TUI sends `UserCommand`s; the controller answers with `UiUpdate`s.
// Background tasks spawned by the controller report back with `TaskEvent`s.

use chrono::{DateTime, Local};
use moodlens_core::client::AnalysisOutcome;
use moodlens_core::protocol::AnalysisResponse;
use moodlens_core::summary::{build_rows, EmotionRow, Summary};

/// Which region of the screen is showing. Exactly one of Loading, Results
/// and Error is visible at a time; Idle shows none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Results,
    Error,
}

/// Reachability of the classification service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online { model: Option<String> },
    Offline { reason: String },
}

/// Commands from the TUI to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Analyze the raw (untrimmed) input at the given threshold.
    Analyze { text: String, threshold: f64 },
    /// Query `GET /health` again.
    CheckHealth,
    Quit,
}

/// Updates pushed from the controller to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A request was issued: show Loading, disable submit.
    Loading,
    /// The in-flight request resolved, successfully or not: leave Loading
    /// and re-enable submit. Always precedes `Results` or `Error` for a
    /// request.
    RequestSettled,
    Results(Box<RenderedResults>),
    Error(String),
    Backend(BackendStatus),
}

/// Completion messages from tasks spawned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Analysis {
        generation: u64,
        outcome: AnalysisOutcome,
    },
    Health(BackendStatus),
}

/// A response turned into display rows plus summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResults {
    pub rows: Vec<EmotionRow>,
    pub summary: Summary,
    pub received_at: DateTime<Local>,
}

impl RenderedResults {
    pub fn from_response(response: &AnalysisResponse) -> Self {
        RenderedResults {
            rows: build_rows(&response.emotions),
            summary: Summary::from_scores(&response.emotions),
            received_at: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
