//! Keybinding definitions for the TUI.
//!
//! Two maps: [`map_key`] for browsing, and [`map_text_key`] while a form,
//! filter prompt or the login screen owns the keyboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    NewItem,
    EditItem,
    DeleteItem,
    /// Resource-specific row action (approve, complete).
    Secondary,
    /// Page tools: uploads, roster and timetable edits.
    OpenTools,
    EditFilters,
    ClearFilters,
    Refresh,
    Logout,
    OpenHelp,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteItem),
        KeyCode::Char('a') => Some(Action::Secondary),
        KeyCode::Char('t') => Some(Action::OpenTools),
        KeyCode::Char('f') | KeyCode::Char('/') => Some(Action::EditFilters),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Enter | KeyCode::Char('y') => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let idx = match c {
                '0' => 9,
                d => d.to_digit(10)? as usize - 1,
            };
            Some(Action::SwitchView(idx))
        }
        _ => None,
    }
}

pub fn map_text_key(event: KeyEvent) -> Option<TextKey> {
    let KeyEvent { code, modifiers, .. } = event;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(TextKey::Cancel),
            _ => None,
        };
    }
    match code {
        KeyCode::Char(c) => Some(TextKey::Char(c)),
        KeyCode::Backspace => Some(TextKey::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(TextKey::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(TextKey::PrevField),
        KeyCode::Enter => Some(TextKey::Submit),
        KeyCode::Esc => Some(TextKey::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn browsing_keys() {
        assert_eq!(map_key(key(KeyCode::Char('n'))), Some(Action::NewItem));
        assert_eq!(map_key(key(KeyCode::Char('t'))), Some(Action::OpenTools));
        assert_eq!(map_key(key(KeyCode::Char('1'))), Some(Action::SwitchView(0)));
        assert_eq!(map_key(key(KeyCode::Char('0'))), Some(Action::SwitchView(9)));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Refresh)
        );
    }

    #[test]
    fn text_mode_passes_letters_through() {
        assert_eq!(map_text_key(key(KeyCode::Char('q'))), Some(TextKey::Char('q')));
        assert_eq!(map_text_key(key(KeyCode::Esc)), Some(TextKey::Cancel));
    }
}
