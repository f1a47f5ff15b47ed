//! Terminal lifecycle and the event loop.
//!
//! A blocking task turns crossterm events into messages. The loop below waits
//! for the next message or the poll tick, hands it to the `Ui`, then flushes
//! the screen buffer and any pending artwork change to the terminal.

use std::io;
use std::time::Duration;

use mpdeck_proto::PlaybackService;
use ratatui::crossterm::{
    event::{self, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::artwork::{ArtworkCanvas, KittyCanvas, DEFAULT_CELL_PX};
use crate::keys::Key;
use crate::ui::Ui;
use crate::widget::Outcome;

enum AppMessage {
    Key(Key),
    Resize(u16, u16),
}

pub struct App<S> {
    ui: Ui<S>,
    tick: Duration,
}

impl<S: PlaybackService> App<S> {
    pub fn new(ui: Ui<S>, tick: Duration) -> Self {
        Self { ui, tick }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        let mut canvas = KittyCanvas::new(io::stdout());
        debug!("terminal ready, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, &mut canvas).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        if let Err(err) = canvas.hide() {
            warn!("could not clear artwork: {}", err);
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("mpdeck exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        canvas: &mut KittyCanvas<io::Stdout>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(64);

        // ── Background task: keyboard events ──────────────────────────────────
        tokio::task::spawn_blocking(move || {
            while !tx.is_closed() {
                // Poll so the task notices the loop has gone away.
                match event::poll(Duration::from_millis(100)) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(_) => break,
                }
                let message = match event::read() {
                    Ok(Event::Key(key)) => match Key::from_event(key) {
                        Some(key) => AppMessage::Key(key),
                        None => continue,
                    },
                    Ok(Event::Resize(w, h)) => AppMessage::Resize(w, h),
                    Ok(_) => continue,
                    Err(_) => break,
                };
                if tx.blocking_send(message).is_err() {
                    break;
                }
            }
        });

        let size = terminal.size()?;
        self.ui.resize(Rect::new(0, 0, size.width, size.height));
        self.ui.set_cell_pixels(cell_pixels());
        self.ui.launch().await;

        let mut tick = tokio::time::interval(self.tick);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| f.render_widget(&self.ui.screen, f.area()))?;
            if let Some(change) = self.ui.take_artwork() {
                if let Err(err) = canvas.apply(&change) {
                    warn!("artwork: {}", err);
                }
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(AppMessage::Key(key)) => {
                        if self.ui.dispatch(key).await == Outcome::Exit {
                            break;
                        }
                    }
                    Some(AppMessage::Resize(w, h)) => {
                        terminal.autoresize()?;
                        self.ui.resize(Rect::new(0, 0, w, h));
                        self.ui.set_cell_pixels(cell_pixels());
                    }
                    None => break,
                },
                _ = tick.tick() => self.ui.tick().await,
            }
        }
        Ok(())
    }
}

/// Cell size in pixels, from the terminal's reported window size.
fn cell_pixels() -> (u16, u16) {
    match terminal::window_size() {
        Ok(ws) if ws.width > 0 && ws.height > 0 && ws.columns > 0 && ws.rows > 0 => {
            (ws.width / ws.columns, ws.height / ws.rows)
        }
        _ => DEFAULT_CELL_PX,
    }
}
