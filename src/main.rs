//! fetchstate - request a URL and watch its state
//!
//! A terminal UI that performs one HTTP request through a request controller
//! and shows its loading, error and data state, with a key to retry.

mod app;
mod ui;

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use app::App;
use fetchstate::cli::{Cli, StartupConfig};
use fetchstate::{HttpTransport, MemoryCache, RequestController, TransportError};

type HttpController = RequestController<Value, HttpTransport>;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Logs go to stderr, so only plain mode installs a subscriber
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Fetches once and prints the payload or the error
async fn run_plain(controller: HttpController) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let state = controller.attach().await.unwrap_or_else(|| controller.snapshot());

    if let Some(error) = state.error() {
        eprintln!("error: {}", error);
        if let TransportError::Status { body, .. } = error {
            if !body.is_empty() {
                eprintln!("{}", body);
            }
        }
        return Ok(ExitCode::FAILURE);
    }

    let payload = state.data.unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(ExitCode::SUCCESS)
}

/// Runs the interactive view until the user quits
async fn run_tui(controller: HttpController) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);

    // Trigger the initial fetch; it publishes Loading/Success/Failure as it goes
    app.spawn_attach();

    // Main event loop
    loop {
        app.sync_state();
        terminal.draw(|f| ui::render_response(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.spawn_pending_retry();

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return Ok(ExitCode::from(2));
        }
    };

    let transport = HttpTransport::with_config(config.http.clone())?;
    let cache = Arc::new(MemoryCache::<Value>::new());
    let controller = RequestController::new(config.descriptor.clone(), transport, cache);

    if config.plain {
        init_logging();
        return run_plain(controller).await;
    }
    run_tui(controller).await
}
