// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the analyzer screen:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                               |
// +--------------------------------------------------+
// | Input (8 rows)                                   |
// +-------------------------------+------------------+
// | Threshold (75%)               | Submit (25%)     |
// +-------------------------------+------------------+
// | Main: idle / loading / error / results (fill)    |
// +--------------------------------------------------+
// | Help Bar (1 row)                                 |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the text input box, borders included.
const INPUT_HEIGHT: u16 = 8;
/// Height of the threshold/submit row, borders included.
const CONTROLS_HEIGHT: u16 = 3;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: backend status, endpoint, current threshold.
    pub status_bar: Rect,
    /// Multi-line text entry.
    pub input: Rect,
    /// Threshold slider, left of the submit control.
    pub threshold: Rect,
    pub submit: Rect,
    /// The single visible region: idle hint, loading, error or results.
    pub main: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | input(8) | controls(3) | main(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // status bar
            Constraint::Length(INPUT_HEIGHT),    // input
            Constraint::Length(CONTROLS_HEIGHT), // threshold + submit
            Constraint::Min(5),                  // main region
            Constraint::Length(1),               // help bar
        ])
        .split(area);

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(vertical[2]);

    AppLayout {
        status_bar: vertical[0],
        input: vertical[1],
        threshold: controls[0],
        submit: controls[1],
        main: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("input", layout.input),
            ("threshold", layout.threshold),
            ("submit", layout.submit),
            ("main", layout.main),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.input.height, INPUT_HEIGHT);
        assert_eq!(layout.threshold.height, CONTROLS_HEIGHT);
        assert_eq!(layout.submit.height, CONTROLS_HEIGHT);
    }

    #[test]
    fn layout_main_takes_remaining_rows() {
        let layout = build_layout(test_area());
        assert_eq!(layout.main.height, 30 - 1 - INPUT_HEIGHT - CONTROLS_HEIGHT - 1);
    }

    #[test]
    fn layout_threshold_left_of_submit() {
        let layout = build_layout(test_area());
        assert_eq!(layout.threshold.y, layout.submit.y);
        assert!(layout.threshold.x < layout.submit.x);
        assert!(layout.threshold.width > layout.submit.width);
    }

    #[test]
    fn layout_zones_stack_top_to_bottom() {
        let layout = build_layout(test_area());
        assert!(layout.status_bar.y < layout.input.y);
        assert!(layout.input.y < layout.threshold.y);
        assert!(layout.threshold.y < layout.main.y);
        assert!(layout.main.y < layout.help_bar.y);
        assert_eq!(layout.help_bar.y, 29);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        for rect in [
            layout.status_bar,
            layout.input,
            layout.threshold,
            layout.submit,
            layout.main,
            layout.help_bar,
        ] {
            assert!(rect.right() <= area.right());
            assert!(rect.bottom() <= area.bottom());
        }
    }
}
