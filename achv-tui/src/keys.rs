//! Keybinding definitions for the TUI.

use crate::state::Focus;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchFocus,
    ToggleForm,
    // Form
    NextField,
    PrevField,
    CycleNext,
    CyclePrev,
    Input(char),
    Backspace,
    Submit,
    // Results
    MoveUp,
    MoveDown,
    ToggleNode,
    ToggleCompleted,
    Export,
}

/// Map a key press to an action. Form focus sends printable characters to
/// the focused field, so single-letter commands only apply to results.
pub fn map_key(event: KeyEvent, focus: Focus) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match focus {
        Focus::Form => match code {
            KeyCode::Esc => Some(Action::SwitchFocus),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Right => Some(Action::CycleNext),
            KeyCode::Left => Some(Action::CyclePrev),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        Focus::Results => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc | KeyCode::Tab => Some(Action::SwitchFocus),
            KeyCode::Char('f') => Some(Action::ToggleForm),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleNode),
            KeyCode::Char('c') => Some(Action::ToggleCompleted),
            KeyCode::Char('m') => Some(Action::Export),
            _ => None,
        },
    }
}
