//! Display modes and the global keymap consulted when no widget claims a key.

use crate::keys::Key;

/// Which panes are on screen and how the status pane is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Full-screen play queue with a compact status bar.
    Queue,
    /// Enlarged status with artwork.
    NowPlaying,
    /// Playlist browser and editor with a compact status bar.
    Playlists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalCommand {
    // ── Display ──────────────────────────────────────────────────────────────
    SetMode(Mode),

    // ── Playback ─────────────────────────────────────────────────────────────
    TogglePause,
    Skip,
    ToggleRandom,
    ToggleRepeat,

    Quit,
}

pub fn global_command(key: Key) -> Option<GlobalCommand> {
    let command = match key {
        Key::Char('1') => GlobalCommand::SetMode(Mode::Queue),
        Key::Char('2') => GlobalCommand::SetMode(Mode::NowPlaying),
        Key::Char('3') => GlobalCommand::SetMode(Mode::Playlists),
        Key::Char('p') => GlobalCommand::TogglePause,
        Key::Char('s') => GlobalCommand::ToggleRandom,
        Key::Char('r') => GlobalCommand::ToggleRepeat,
        Key::Right => GlobalCommand::Skip,
        Key::Interrupt => GlobalCommand::Quit,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keymap() {
        assert_eq!(global_command(Key::Char('2')), Some(GlobalCommand::SetMode(Mode::NowPlaying)));
        assert_eq!(global_command(Key::Right), Some(GlobalCommand::Skip));
        assert_eq!(global_command(Key::Char('P')), None);
        assert_eq!(global_command(Key::Esc), None);
    }
}
