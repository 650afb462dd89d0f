// Status bar widget: service reachability, endpoint, threshold, last result.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::BackendStatus;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [backend indicator] [base url] | [threshold] | [last analyzed]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = backend_indicator(&state.backend);
    let mut spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(
            backend_label(&state.backend),
            Style::default().fg(dot_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::Gray)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("Threshold {}", state.threshold_display()),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(results) = &state.results {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("Last analyzed {}", results.received_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the status dot character and its color.
pub fn backend_indicator(status: &BackendStatus) -> (&'static str, Color) {
    match status {
        BackendStatus::Unknown => ("○", Color::Yellow),
        BackendStatus::Online { .. } => ("●", Color::Green),
        BackendStatus::Offline { .. } => ("●", Color::Red),
    }
}

/// Short description of the backend, including the model name when known.
pub fn backend_label(status: &BackendStatus) -> String {
    match status {
        BackendStatus::Unknown => "Checking".to_string(),
        BackendStatus::Online { model: Some(model) } => format!("Online ({})", model),
        BackendStatus::Online { model: None } => "Online".to_string(),
        BackendStatus::Offline { .. } => "Offline".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
