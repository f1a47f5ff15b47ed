//! Modal dialogue: a message, zero or more text fields and an option
//! selector, always last.
//!
//! The dialogue is a small state machine over field indices. Tab/Down and
//! Up/Shift-Tab walk the fields, Left/Right pick an option while the
//! selector is current, and Enter on the selector confirms. Confirming yields
//! the chosen option's command (if any); running it and tearing the dialogue
//! down is the controller's job.

use ratatui::layout::Rect;

use crate::keys::Key;
use crate::screen::Screen;
use crate::theme::{style_accent, style_default, style_secondary};
use crate::widgets::fit::{self, Align};
use crate::widgets::text_field::TextField;

/// What a confirmed option asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueCommand {
    DeletePlaylist(String),
    /// Create a playlist named after the dialogue's text field.
    CreatePlaylist,
    ClearQueue,
}

#[derive(Debug, Clone)]
pub struct Radio {
    options: Vec<String>,
    current: usize,
}

impl Radio {
    pub fn new(options: &[&str], selected: usize) -> Self {
        let options: Vec<String> = if options.is_empty() {
            vec!["ok".to_string()]
        } else {
            options.iter().map(|o| o.to_string()).collect()
        };
        let current = selected.min(options.len() - 1);
        Self { options, current }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.options.len();
    }

    pub fn prev(&mut self) {
        self.current = (self.current + self.options.len() - 1) % self.options.len();
    }

    fn draw(&self, screen: &mut Screen, row: Rect, focused: bool) {
        let plain = self.options.join("/");
        let start = row.right().saturating_sub(fit::width(&plain) as u16).max(row.x);
        let mut x = start;
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                x = screen.put(x, row.y, "/", row.right() - x, style_secondary());
            }
            let style = if focused && i == self.current {
                style_accent()
            } else {
                style_default()
            };
            x = screen.put(x, row.y, option, row.right() - x, style);
        }
    }
}

#[derive(Debug, Clone)]
pub enum Field {
    Text(TextField),
    Options(Radio),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueEvent {
    Redraw,
    Ignored,
    Cancelled,
    Confirmed { option: usize },
}

#[derive(Debug, Clone)]
pub struct Dialogue {
    message: String,
    fields: Vec<Field>,
    current: usize,
    commands: Vec<Option<DialogueCommand>>,
}

impl Dialogue {
    /// Message plus option selector; `commands[i]` runs when option `i` is
    /// confirmed.
    pub fn confirm(
        message: impl Into<String>,
        options: &[&str],
        selected: usize,
        commands: Vec<Option<DialogueCommand>>,
    ) -> Self {
        Self {
            message: message.into(),
            fields: vec![Field::Options(Radio::new(options, selected))],
            current: 0,
            commands,
        }
    }

    /// A text field ahead of the selector. Editing starts in the text field.
    pub fn prompt(
        message: impl Into<String>,
        initial: &str,
        options: &[&str],
        commands: Vec<Option<DialogueCommand>>,
    ) -> Self {
        let mut dialogue = Self::confirm(message, options, 0, commands);
        dialogue.fields.insert(0, Field::Text(TextField::new(initial)));
        dialogue
    }

    /// Single acknowledgement option, no command.
    pub fn notice(message: impl Into<String>) -> Self {
        Self::confirm(message, &["ok"], 0, Vec::new())
    }

    pub fn current_field(&self) -> usize {
        self.current
    }

    /// Content of the first text field, if the dialogue has one.
    pub fn text(&self) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            Field::Text(t) => Some(t.value()),
            Field::Options(_) => None,
        })
    }

    pub fn command_for(&self, option: usize) -> Option<DialogueCommand> {
        self.commands.get(option).cloned().flatten()
    }

    fn on_selector(&self) -> bool {
        self.current + 1 == self.fields.len()
    }

    fn advance(&mut self) {
        self.current = (self.current + 1) % self.fields.len();
    }

    fn retreat(&mut self) {
        self.current = (self.current + self.fields.len() - 1) % self.fields.len();
    }

    fn selector(&self) -> Option<&Radio> {
        match self.fields.last() {
            Some(Field::Options(radio)) => Some(radio),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: Key) -> DialogueEvent {
        match key {
            Key::Esc => return DialogueEvent::Cancelled,
            Key::Enter if self.on_selector() => {
                let option = self.selector().map(Radio::current).unwrap_or(0);
                return DialogueEvent::Confirmed { option };
            }
            Key::Enter | Key::Tab | Key::Down => {
                self.advance();
                return DialogueEvent::Redraw;
            }
            Key::Up | Key::BackTab => {
                self.retreat();
                return DialogueEvent::Redraw;
            }
            _ => {}
        }
        match (self.fields.get_mut(self.current), key) {
            (Some(Field::Options(radio)), Key::Right) => radio.next(),
            (Some(Field::Options(radio)), Key::Left) => radio.prev(),
            (Some(Field::Text(text)), Key::Char(c)) => text.push(c),
            (Some(Field::Text(text)), Key::Backspace) => text.backspace(),
            _ => return DialogueEvent::Ignored,
        }
        DialogueEvent::Redraw
    }

    /// Message at the top, text fields below it, selector on the last row.
    pub fn draw(&self, screen: &mut Screen, area: Rect) {
        screen.blank(area);
        if area.height == 0 || area.width == 0 {
            return;
        }
        let inputs = self.fields.len() - 1;
        let message_rows = usize::from(area.height).saturating_sub(self.fields.len());
        let lines = fit::wrap(&self.message, usize::from(area.width));
        let mut y = area.y;
        for line in lines.iter().take(message_rows) {
            screen.put(area.x, y, &fit::align(line, usize::from(area.width), Align::Left), area.width, style_default());
            y += 1;
        }
        for (i, field) in self.fields[..inputs].iter().enumerate() {
            if y >= area.bottom() - 1 {
                break;
            }
            if let Field::Text(text) = field {
                text.draw(screen, Rect::new(area.x, y, area.width, 1), i == self.current);
            }
            y += 1;
        }
        if let Some(radio) = self.selector() {
            let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            radio.draw(screen, row, self.on_selector());
        }
    }
}
