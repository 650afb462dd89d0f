// Results widget: summary statistics and one bar per detected emotion.
//
// Header: "Detected: N   Highest: x%   Average: y%"
// Rows:   "{icon} {label}  ██████░░░░  80.0%" in the order received
// Empty:  placeholder text instead of rows

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    Wrap,
};
use ratatui::Frame;

use moodlens_core::summary::{EmotionRow, Summary, EMPTY_PLACEHOLDER};

use crate::tui::ViewState;

/// Width reserved for the label column.
const LABEL_WIDTH: usize = 15;
/// Icon (2) + spaces + label + spaces + value (6).
const FIXED_ROW_WIDTH: usize = 2 + 1 + LABEL_WIDTH + 2 + 2 + 6;

/// Render the results panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(results) = &state.results else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(summary_line(&results.summary));

    if results.is_empty() {
        let paragraph = Paragraph::new(format!(" {}", EMPTY_PLACEHOLDER))
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = results.rows.len();
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state.results_scroll.min(max_offset);

    let bar_width = (area.width as usize)
        .saturating_sub(2 + FIXED_ROW_WIDTH)
        .max(1);

    let items: Vec<ListItem> = results
        .rows
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|row| ListItem::new(row_line(row, bar_width)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    // Render vertical scrollbar if content overflows
    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Block title carrying the three summary statistics.
pub fn summary_line(summary: &Summary) -> Line<'static> {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(" Detected: ", label),
        Span::styled(summary.count_text(), value),
        Span::styled("   Highest: ", label),
        Span::styled(summary.max_text(), value),
        Span::styled("   Average: ", label),
        Span::styled(summary.avg_text(), value),
        Span::raw(" "),
    ])
}

/// One chart row: icon, padded label, bar and value.
fn row_line(row: &EmotionRow, bar_width: usize) -> Line<'static> {
    let (filled, empty) = bar_cells(row.bar_percent, bar_width);
    Line::from(vec![
        Span::raw(format!("{} ", row.icon)),
        Span::styled(
            format!("{:<width$}", row.label, width = LABEL_WIDTH),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled("█".repeat(filled), Style::default().fg(bar_color(row.bar_percent))),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(
            format!("{:>6}", row.value_text),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Split `width` cells into (filled, empty) for a bar at `percent` of full.
pub fn bar_cells(percent: f64, width: usize) -> (usize, usize) {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    (filled, width - filled)
}

/// Stronger scores get warmer colors.
pub fn bar_color(percent: f64) -> Color {
    if percent >= 75.0 {
        Color::Magenta
    } else if percent >= 50.0 {
        Color::Blue
    } else {
        Color::Cyan
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
