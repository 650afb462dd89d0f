// TUI: view state, input handling, and rendering.
//
// The TUI owns a `ViewState` holding everything on screen: the input
// buffer, the threshold slider and the loading/error/results regions. The
// controller pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::supports_keyboard_enhancement;
use futures_util::{Stream, StreamExt};
use moodlens_core::config::Config;
use moodlens_core::summary::format_threshold;
use ratatui::backend::Backend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{BackendStatus, RenderedResults, UiState, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Which control receives plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Threshold,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Everything the screen shows. Mutated only by the TUI task.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Text area contents, untrimmed.
    pub input: String,
    pub focus: Focus,
    /// Slider position in [0, 1].
    pub threshold: f64,
    /// Slider movement per keypress.
    pub threshold_step: f64,
    /// Example texts bound to F1..F9.
    pub presets: Vec<String>,
    /// Which region is visible.
    pub ui_state: UiState,
    /// Whether the analyze control accepts input.
    pub submit_enabled: bool,
    pub error_message: Option<String>,
    pub results: Option<RenderedResults>,
    pub backend: BackendStatus,
    /// Shown in the status bar.
    pub base_url: String,
    /// First visible row of the results chart.
    pub results_scroll: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            input: String::new(),
            focus: Focus::Input,
            threshold: 0.5,
            threshold_step: 0.05,
            presets: Vec::new(),
            ui_state: UiState::Idle,
            submit_enabled: true,
            error_message: None,
            results: None,
            backend: BackendStatus::Unknown,
            base_url: String::new(),
            results_scroll: 0,
        }
    }
}

impl ViewState {
    pub fn from_config(config: &Config) -> Self {
        ViewState {
            threshold: config.analysis.default_threshold,
            threshold_step: config.analysis.threshold_step,
            presets: config.examples.presets.clone(),
            base_url: config.service.base_url.clone(),
            ..ViewState::default()
        }
    }

    pub fn loading_visible(&self) -> bool {
        self.ui_state == UiState::Loading
    }

    pub fn results_visible(&self) -> bool {
        self.ui_state == UiState::Results
    }

    pub fn error_visible(&self) -> bool {
        self.ui_state == UiState::Error
    }

    /// Move the slider, clamped to [0, 1]. Values are snapped to four
    /// decimals so repeated steps do not drift.
    pub fn set_threshold(&mut self, value: f64) {
        let clamped = value.clamp(0.0, 1.0);
        self.threshold = (clamped * 10_000.0).round() / 10_000.0;
    }

    pub fn nudge_threshold(&mut self, steps: f64) {
        self.set_threshold(self.threshold + steps * self.threshold_step);
    }

    /// Slider label, e.g. `"50%"`.
    pub fn threshold_display(&self) -> String {
        format_threshold(self.threshold)
    }

    /// Copy preset `index` into the input and focus it. Returns `false` if
    /// no such preset exists.
    pub fn load_example(&mut self, index: usize) -> bool {
        match self.presets.get(index) {
            Some(text) => {
                self.input = text.clone();
                self.focus = Focus::Input;
                true
            }
            None => false,
        }
    }

    /// Empty the input and hide the results and error regions. An in-flight
    /// request keeps Loading visible.
    pub fn clear(&mut self) {
        self.input.clear();
        self.error_message = None;
        self.results = None;
        self.results_scroll = 0;
        if matches!(self.ui_state, UiState::Results | UiState::Error) {
            self.ui_state = UiState::Idle;
        }
    }

    /// Move the results view by `rows`, keeping at least one row on screen.
    /// Stays at 0 while no results are shown.
    pub fn scroll_results(&mut self, rows: isize) {
        let row_count = match (&self.results, self.ui_state) {
            (Some(results), UiState::Results) => results.rows.len(),
            _ => 0,
        };
        let max_offset = row_count.saturating_sub(1);
        self.results_scroll = self
            .results_scroll
            .saturating_add_signed(rows)
            .min(max_offset);
    }

    /// Build the analyze command, or `None` while submit is disabled.
    pub fn submit(&self) -> Option<UserCommand> {
        if !self.submit_enabled {
            return None;
        }
        Some(UserCommand::Analyze {
            text: self.input.clone(),
            threshold: self.threshold,
        })
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Loading => {
            state.ui_state = UiState::Loading;
            state.submit_enabled = false;
            state.error_message = None;
        }
        UiUpdate::RequestSettled => {
            if state.ui_state == UiState::Loading {
                state.ui_state = UiState::Idle;
            }
            state.submit_enabled = true;
        }
        UiUpdate::Results(results) => {
            state.results = Some(*results);
            state.results_scroll = 0;
            state.ui_state = UiState::Results;
        }
        UiUpdate::Error(message) => {
            state.error_message = Some(message);
            state.ui_state = UiState::Error;
        }
        UiUpdate::Backend(status) => {
            state.backend = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::input_panel::render_input(frame, layout.input, state);
    widgets::input_panel::render_threshold(frame, layout.threshold, state);
    widgets::input_panel::render_submit(frame, layout.submit, state);
    render_main_region(frame, &layout, state);
    render_help_bar(frame, &layout);
}

fn render_main_region(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.ui_state {
        UiState::Idle => widgets::message::render_idle(frame, layout.main, state),
        UiState::Loading => widgets::message::render_loading(frame, layout.main),
        UiState::Error => widgets::message::render_error(frame, layout.main, state),
        UiState::Results => widgets::results::render(frame, layout.main, state),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " Ctrl+Enter:Analyze | Tab:Focus | Up/Down:Threshold | F1-F9:Examples | Esc:Clear | Ctrl+R:Health | Ctrl+C:Quit";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Initializes the terminal, asks for disambiguated key reporting so
/// Ctrl+Enter can be told apart from Enter, and restores everything on exit,
/// error or panic.
pub async fn run(
    ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let enhanced_keys = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced_keys {
        if let Err(e) = execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        ) {
            warn!("failed to enable keyboard enhancement: {}", e);
        }
    } else {
        debug!("keyboard enhancement unsupported; Alt+Enter submits");
    }
    if let Err(e) = execute!(stdout(), EnableBracketedPaste) {
        warn!("failed to enable bracketed paste: {}", e);
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let outcome = event_loop(
        &mut terminal,
        EventStream::new(),
        ui_rx,
        cmd_tx,
        view_state,
    )
    .await;

    restore_terminal(enhanced_keys);
    outcome
}

/// Apply updates, dispatch terminal events and redraw until the user quits,
/// the controller hangs up, or the terminal fails.
pub async fn event_loop<B, S>(
    terminal: &mut Terminal<B>,
    mut events: S,
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
    S: Stream<Item = std::io::Result<Event>> + Unpin,
{
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut outcome = Ok(());
    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Controller is gone.
                    None => break,
                }
            }

            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(Event::Paste(text))) => {
                        if view_state.focus == Focus::Input {
                            view_state.input.push_str(&text);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        outcome = Err(anyhow::Error::from(e).context("failed to read terminal input"));
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    outcome = Err(anyhow::Error::from(e).context("failed to draw frame"));
                    break;
                }
            }
        }
    }

    outcome
}

/// Undo the terminal modes set up by `run`.
fn restore_terminal(enhanced_keys: bool) {
    let _ = execute!(stdout(), DisableBracketedPaste);
    if enhanced_keys {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
