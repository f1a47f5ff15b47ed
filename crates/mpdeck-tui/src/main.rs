mod action;
mod app;
mod artwork;
mod keys;
mod layout;
mod panes;
mod screen;
mod theme;
mod ui;
mod widget;
mod widgets;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use mpdeck_proto::config::Config;
use mpdeck_proto::mpd::MpdClient;
use mpdeck_proto::{platform, PlaybackService};
use ratatui::layout::Rect;

use crate::app::App;
use crate::ui::Ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("mpdeck log: {}", log_path.display());
    tracing::info!("mpdeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("config unreadable, using defaults: {:#}", err);
        Config::default()
    });

    let mut client = MpdClient::from_config(&config);
    client
        .connect()
        .await
        .with_context(|| format!("could not reach mpd at {}", client.address()))?;
    tracing::info!("connected to {}", client.address());

    // The real size arrives once the terminal is up.
    let ui = Ui::new(client, Rect::default(), config.artwork.placeholder.clone())?;
    App::new(ui, config.ui.tick()).run().await
}
