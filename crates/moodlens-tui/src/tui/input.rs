// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// controller, or into local ViewState mutations (typing, slider moves,
// example loading, clearing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Focus, ViewState};
use crate::protocol::UserCommand;

/// Results rows skipped per PageUp/PageDown.
const PAGE_SIZE: isize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the controller. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; only act on Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        match key_event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return Some(UserCommand::Quit),
            KeyCode::Char('r') => return Some(UserCommand::CheckHealth),
            _ => {}
        }
    }

    // Modifier+Enter is the submit shortcut. Alt+Enter covers terminals
    // that report Ctrl+Enter as plain Enter.
    if key_event.code == KeyCode::Enter && (ctrl || alt) {
        return view_state.submit();
    }

    match key_event.code {
        KeyCode::Esc => {
            view_state.clear();
            None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            view_state.focus = match view_state.focus {
                Focus::Input => Focus::Threshold,
                Focus::Threshold => Focus::Input,
            };
            None
        }
        KeyCode::F(12) => Some(UserCommand::CheckHealth),
        KeyCode::F(n @ 1..=9) => {
            view_state.load_example(usize::from(n) - 1);
            None
        }
        KeyCode::Up => {
            view_state.nudge_threshold(1.0);
            None
        }
        KeyCode::Down => {
            view_state.nudge_threshold(-1.0);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll_results(PAGE_SIZE);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll_results(-PAGE_SIZE);
            None
        }
        _ => match view_state.focus {
            Focus::Input => handle_text_key(key_event, view_state),
            Focus::Threshold => handle_slider_key(key_event, view_state),
        },
    }
}

/// Keys while the text area has focus.
fn handle_text_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => view_state.input.push('\n'),
        KeyCode::Backspace => {
            view_state.input.pop();
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.input.push(c);
        }
        _ => {}
    }
    None
}

/// Keys while the threshold slider has focus.
fn handle_slider_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => view_state.nudge_threshold(1.0),
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => view_state.nudge_threshold(-1.0),
        KeyCode::Home => view_state.set_threshold(0.0),
        KeyCode::End => view_state.set_threshold(1.0),
        _ => {}
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
