//! Keys the widget tree understands, decoded from terminal events.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    /// Multi-select toggle: mark the cursor row and advance.
    ShiftDown,
    Left,
    Right,
    Enter,
    Backspace,
    Tab,
    BackTab,
    Delete,
    /// Esc, or the backtick for terminals that delay a bare Esc.
    Esc,
    /// Ctrl-C. Always quits.
    Interrupt,
}

impl Key {
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let key = match event.code {
            KeyCode::Char('c') if ctrl => Key::Interrupt,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char('`') => Key::Esc,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Down if shift => Key::ShiftDown,
            KeyCode::Down => Key::Down,
            KeyCode::Up => Key::Up,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab if shift => Key::BackTab,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Delete => Key::Delete,
            KeyCode::Esc => Key::Esc,
            _ => return None,
        };
        Some(key)
    }
}
