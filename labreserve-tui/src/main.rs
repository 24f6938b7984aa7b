//! labreserve terminal client
//!
//! One message loop drives everything: keyboard input comes from a
//! dedicated reader thread, session expiry from the gateway's broadcast
//! channel, and finished API calls from spawned tasks. Each message is
//! applied to the application state, then the frame is redrawn.

mod app;
mod composer;
mod config;
mod gate;
mod msg;
mod screens;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use labreserve_client::{ApiClient, ClientConfig, SessionHandle, SessionStore};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::AppConfig;
use crate::msg::Msg;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();

    // Logs go to a file; stdout belongs to the terminal UI.
    std::fs::create_dir_all(&config.log_dir).context("creating log directory")?;
    let appender = tracing_appender::rolling::daily(&config.log_dir, "labreserve.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    tracing::info!("starting labreserve client against {}", config.api_url);

    let session = SessionHandle::new(SessionStore::new(&config.data_dir));
    let client_config = ClientConfig::new(config.api_url.clone());
    let api = Arc::new(ApiClient::new(&client_config, session.clone())?);

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Keyboard reader on its own thread; crossterm's read() blocks.
    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(Msg::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });
    }

    // Session expiry events join the same stream.
    {
        let tx = tx.clone();
        let mut events = session.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if tx.send(Msg::Session(event)).is_err() {
                    break;
                }
            }
        });
    }

    let mut terminal = ratatui::init();
    let mut app = App::new(api, tx);
    while app.running {
        terminal.draw(|f| ui::draw(f, &app))?;
        let Some(msg) = rx.recv().await else {
            break;
        };
        app.update(msg);
        // Drain whatever queued up before redrawing.
        while app.running {
            match rx.try_recv() {
                Ok(msg) => app.update(msg),
                Err(_) => break,
            }
        }
    }
    ratatui::restore();
    Ok(())
}
