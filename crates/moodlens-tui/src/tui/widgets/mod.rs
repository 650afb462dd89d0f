// TUI widget modules for each screen zone.

pub mod input_panel;
pub mod message;
pub mod results;
pub mod status_bar;

use ratatui::style::{Color, Style};

/// Border style for a control, highlighted when it has keyboard focus.
pub fn focused_border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Flatten a rendered buffer into one string per row.
#[cfg(test)]
pub(crate) fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}
