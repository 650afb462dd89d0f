// Main-region messages: idle hint, loading indicator and error text.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

/// Preset previews are cut to this many characters.
const PRESET_PREVIEW_CHARS: usize = 60;

/// Nothing analyzed yet (or cleared): show how to start and list presets.
pub fn render_idle(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![Line::from(Span::styled(
        " Enter some text and press Ctrl+Enter to detect emotions.",
        Style::default().fg(Color::Gray),
    ))];

    if !state.presets.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            " Examples:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (i, preset) in state.presets.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  F{:<2} ", i + 1), Style::default().fg(Color::Cyan)),
                Span::raw(preview(preset)),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

pub fn render_loading(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        " Analyzing emotions...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_error(frame: &mut Frame, area: Rect, state: &ViewState) {
    let message = state.error_message.as_deref().unwrap_or_default();
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        );
    frame.render_widget(paragraph, area);
}

/// First line of a preset, truncated with an ellipsis.
pub fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > PRESET_PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PRESET_PREVIEW_CHARS - 3).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_lines;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("I am so happy"), "I am so happy");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "a".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PRESET_PREVIEW_CHARS);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn preview_uses_first_line() {
        assert_eq!(preview("first\nsecond"), "first");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn idle_lists_presets_with_keys() {
        let backend = ratatui::backend::TestBackend::new(80, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.presets = vec!["I am so happy".to_string(), "This is awful".to_string()];
        terminal
            .draw(|frame| render_idle(frame, frame.area(), &state))
            .unwrap();

        let text = buffer_lines(terminal.backend().buffer()).join("\n");
        assert!(text.contains("F1"));
        assert!(text.contains("I am so happy"));
        assert!(text.contains("F2"));
        assert!(text.contains("This is awful"));
    }

    #[test]
    fn error_renders_message() {
        let backend = ratatui::backend::TestBackend::new(80, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.error_message = Some("Error: API error: 500".to_string());
        terminal
            .draw(|frame| render_error(frame, frame.area(), &state))
            .unwrap();

        let text = buffer_lines(terminal.backend().buffer()).join("\n");
        assert!(text.contains("API error: 500"));
    }

    #[test]
    fn loading_renders_indicator() {
        let backend = ratatui::backend::TestBackend::new(40, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_loading(frame, frame.area()))
            .unwrap();

        let text = buffer_lines(terminal.backend().buffer()).join("\n");
        assert!(text.contains("Analyzing emotions..."));
    }
}
