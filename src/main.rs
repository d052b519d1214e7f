mod app;
mod components;
mod config;
mod error;
mod event;
mod fav;
mod handler;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// A terminal favorites manager.
#[derive(Parser, Debug)]
#[command(name = "favorites_tui", version, about)]
struct Cli {
    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the favorites data file location
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Override the UI state file location
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Color scheme: dark or light
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// Partial config built from the CLI flags; merged on top of files.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                data_file: self
                    .data_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                state_file: self
                    .state_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(&config, events.sender());

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::PrefetchProgress {
                done,
                total,
                generation,
            } => app.handle_prefetch_progress(done, total, generation),
            Event::PrefetchComplete { generation } => app.handle_prefetch_complete(generation),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
