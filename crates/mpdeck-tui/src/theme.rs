//! Colours and styles.
//!
//! mpdeck draws on a dark background with an amber accent; everything that
//! is "about the music" (artist, album, the playing row) gets its own hue so
//! rows stay readable when truncated.

use ratatui::style::{Color, Modifier, Style};

pub const AMBER: Color = Color::Rgb(240, 170, 60);
pub const MINT: Color = Color::Rgb(110, 210, 170);
pub const BRICK: Color = Color::Rgb(220, 90, 70);
pub const SKY: Color = Color::Rgb(120, 170, 230);

const TEXT: Color = Color::Rgb(225, 220, 205);
const TEXT_DIM: Color = Color::Rgb(140, 135, 120);
pub const SLATE: Color = Color::Rgb(85, 85, 80);
const ARTIST: Color = Color::Rgb(230, 200, 140);
const ALBUM: Color = Color::Rgb(170, 150, 210);

const CURSOR_BG: Color = Color::Rgb(45, 40, 30);
const FRAME: Color = Color::Rgb(60, 58, 52);
const FRAME_FOCUSED: Color = AMBER;
const INPUT_BG: Color = Color::Rgb(30, 28, 24);

pub fn style_default() -> Style {
    Style::default().fg(TEXT)
}

pub fn style_secondary() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn style_muted() -> Style {
    Style::default().fg(SLATE)
}

pub fn style_accent() -> Style {
    Style::default().fg(AMBER)
}

/// Row of the song the server is playing.
pub fn style_playing() -> Style {
    Style::default().fg(MINT)
}

pub fn style_artist() -> Style {
    Style::default().fg(ARTIST)
}

pub fn style_album() -> Style {
    Style::default().fg(ALBUM).add_modifier(Modifier::ITALIC)
}

pub fn style_cursor() -> Style {
    Style::default().bg(CURSOR_BG).add_modifier(Modifier::BOLD)
}

/// Rows in the multi-selection.
pub fn style_marked() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(FRAME_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(FRAME)
}

pub fn style_filter() -> Style {
    Style::default().fg(AMBER).bg(INPUT_BG)
}

pub fn style_bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
