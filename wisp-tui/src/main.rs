mod api;
mod app;
mod auth;
mod config;
#[macro_use]
mod logging;
mod session;
mod terminal;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use std::time::Duration;

use app::App;

/// WISP - a keyboard-driven terminal client for the WISP wellness platform
#[derive(Parser)]
#[command(name = "wisp")]
#[command(about = "A terminal client for the WISP mental-wellness platform")]
#[command(version)]
struct Cli {
    /// Server URL to connect to (e.g. http://localhost:5000/api)
    #[arg(long, short, env = "WISP_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Open a community route on startup, e.g. /community/threads/42
    #[arg(long)]
    open: Option<String>,
}

// Load environment variables from .env file
// This allows WISP_SERVER_URL and other config to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_env();

    let log_config = if cli.verbose {
        logging::LogConfig::verbose()
    } else {
        logging::LogConfig::default()
    };
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let mut app = App::new();
    app.log_config = log_config;

    let server_url = app.config_manager.resolve_server_url(cli.server);
    log::info!("Using server: {}", server_url);
    app.api_client = api::ApiClient::new(server_url);

    // Restore a stored session; it is trusted until the first 401
    {
        let mut flow = auth::AuthFlow::new(app.api_client.clone())?;
        if let Some(session) = flow.restore_session()? {
            app.api_client = flow.into_api_client();
            app.set_session(session);
        }
    }

    // Deep link straight into a community view
    if let Some(route) = &cli.open {
        if app.session.is_some() {
            app.open_route(route);
        } else {
            log::warn!("--open ignored: not logged in");
        }
    }

    let mut terminal = terminal::init()?;
    let result = run(&mut terminal, &mut app).await;
    terminal::restore()?;
    result
}

async fn run(terminal: &mut terminal::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.clear_expired_notices();

        // Async work queued by the key handlers runs between renders; the
        // render below always sees a consistent state
        if let Some(action) = app.pending_action.take() {
            if let Err(e) = app.perform(action).await {
                log::error!("Action failed: {}", e);
            }
        }
        if let Err(e) = app.drain_pending_loads().await {
            log::error!("Load failed: {}", e);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key)?;
            }
        }
    }
    Ok(())
}
