// Input controls: text area, threshold slider and the analyze button.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use super::focused_border_style;
use crate::tui::{Focus, ViewState};

const INPUT_PLACEHOLDER: &str = "Type or paste text to analyze, or press F1-F9 for an example.";
const CURSOR: &str = "▏";

/// Render the multi-line text input.
///
/// Keeps the last line in view once the text outgrows the box.
pub fn render_input(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focused_border_style(focused))
        .title(input_title(&state.input));

    if state.input.is_empty() {
        let mut spans = Vec::new();
        if focused {
            spans.push(Span::raw(CURSOR));
        }
        spans.push(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ));
        let paragraph = Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines: Vec<Line> = state.input.split('\n').map(Line::raw).collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
        }
    }

    // Line count ignores soft wrapping; good enough to follow the cursor.
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Title for the input box, with the character count once text is present.
pub fn input_title(input: &str) -> String {
    if input.is_empty() {
        "Text".to_string()
    } else {
        format!("Text ({} chars)", input.chars().count())
    }
}

/// Render the threshold slider as a gauge labelled with the whole percentage.
pub fn render_threshold(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Threshold;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focused_border_style(focused))
                .title("Threshold"),
        )
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(state.threshold.clamp(0.0, 1.0))
        .label(state.threshold_display());
    frame.render_widget(gauge, area);
}

/// Render the analyze button. Dimmed while a request is in flight.
pub fn render_submit(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (label, style) = submit_appearance(state.submit_enabled);
    let paragraph = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(paragraph, area);
}

/// Button label and style for the enabled/disabled states.
pub fn submit_appearance(enabled: bool) -> (&'static str, Style) {
    if enabled {
        (
            "Analyze",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Analyzing...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
