//! Decade-journey walk TUI.
//!
//! A terminal client for walking a generated ten-year roadmap: describe
//! where you are and where you want to be, then walk forward through time,
//! revealing one milestone per year until the goal.

mod app;
mod events;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use odyssey_core::{FileStore, GeminiRoadmap, JourneyController, LastJourneyMarker, TICK_INTERVAL};

use app::{App, Command};
use events::{handle_event, EventResult};
use ui::render::{render, render_busy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // Check for API key
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Error: GEMINI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let data_dir = PathBuf::from(
        std::env::var("ODYSSEY_DATA_DIR").unwrap_or_else(|_| ".odyssey".to_string()),
    );
    init_tracing(&data_dir)?;

    tracing::info!(data_dir = %data_dir.display(), "starting odyssey");

    let provider = Arc::new(GeminiRoadmap::from_env()?);
    let store = Arc::new(FileStore::new(data_dir.join("journeys")));
    let marker = LastJourneyMarker::new(data_dir.join("last_journey"));
    let controller = JourneyController::new(provider, store, marker);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(controller)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Poll with the simulation period: events interleave with ticks on a
        // single logical thread, so the intent flags never race the walk.
        if event::poll(TICK_INTERVAL)? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::Command(command) => {
                    // Show the waiting frame before awaiting slow work.
                    if let Some(message) = busy_message(command) {
                        terminal.draw(|f| render_busy(f, &app, message))?;
                    }
                    app.run_command(command).await;
                }
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            app.tick();
        }
    }
}

/// Waiting-frame message for commands that hit the network or disk.
fn busy_message(command: Command) -> Option<&'static str> {
    match command {
        Command::SubmitForm => Some("Weaving your destiny..."),
        Command::FetchSaved => Some("Syncing saved journeys..."),
        Command::ResumeLast => Some("Looking for your last journey..."),
        Command::ResumeSelected | Command::Restart => None,
    }
}

fn init_tracing(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(data_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("odyssey.log"))?;

    // The TUI owns the terminal; logs go to a file.
    let filter = EnvFilter::try_from_env("ODYSSEY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_help() {
    println!("Odyssey - walk a generated ten-year roadmap");
    println!();
    println!("USAGE:");
    println!("  odyssey [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("  GEMINI_API_KEY     Required; key for roadmap generation");
    println!("  ODYSSEY_DATA_DIR   Where journeys and logs live (default: .odyssey)");
    println!("  ODYSSEY_LOG        Log filter, e.g. info or odyssey_core=debug");
    println!();
    println!("KEYS:");
    println!("  Landing:  n new journey, f find saved, r resume last, q quit");
    println!("  Playing:  w/Up walk forward, s/Down walk back, Space stop");
}
