// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (focus, cursor,
// selection, filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (Reload, Quit). Returns `None` when the key press was
/// handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        // Focus
        KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char('h')
        | KeyCode::Char('l') => {
            view_state.focus = view_state.focus.toggle();
            None
        }

        // Cursor
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.focused_picker_mut().move_up(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.focused_picker_mut().move_down(1);
            None
        }
        KeyCode::PageUp => {
            view_state.focused_picker_mut().move_up(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.focused_picker_mut().move_down(PAGE_SIZE);
            None
        }

        // Selection
        KeyCode::Enter | KeyCode::Char(' ') => {
            view_state.focused_picker_mut().toggle_at_cursor();
            None
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            view_state.focused_picker_mut().clear_selection();
            None
        }

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }
        KeyCode::Esc => {
            view_state.focused_picker_mut().clear_filter();
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// In quit confirmation mode `y`/`q` quit, `n`/Esc cancel, and every other
/// key is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// In filter mode printable characters edit the focused picker's filter.
/// Enter leaves filter mode keeping the text; Esc leaves and clears it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.focused_picker_mut().clear_filter();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.focused_picker_mut().pop_filter();
        }
        KeyCode::Up => {
            view_state.focused_picker_mut().move_up(1);
        }
        KeyCode::Down => {
            view_state.focused_picker_mut().move_down(1);
        }
        KeyCode::Char(c) => {
            view_state.focused_picker_mut().push_filter(c);
        }
        _ => {}
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
