#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sportdesk::api::CmsClient;
use sportdesk::config::Config;
use sportdesk::tui::App;

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging()?;

    // Fail before touching the terminal so the message stays readable.
    let config = Config::from_env()?;
    let client = CmsClient::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    tracing::info!("sportdesk starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(client, runtime.handle().clone());
    let result = app.run(&mut terminal);

    let restore_result = restore_terminal();
    runtime.shutdown_background();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

/// Sends log output to `<data dir>/sportdesk/sportdesk.log`; the terminal belongs to the UI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn init_logging() -> Result<(), io::Error> {
    let dir = dirs::data_dir()
        .map(|d| d.join("sportdesk"))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(dir.join("sportdesk.log"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sportdesk=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
