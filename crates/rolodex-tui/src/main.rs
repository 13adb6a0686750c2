//! Rolodex - command-palette search over CRM records, in the terminal.
//!
//! The interactive mode draws a small host view and layers the command palette
//! over it on Ctrl+K. `query` and `recent` give one-shot access to the same
//! search and recent-searches log for scripting.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use rolodex_core::config::{Config, Directories};
use rolodex_core::dispatch::DispatchUpdate;
use rolodex_core::gateway::{Backend, QueryGateway, meets_threshold};
use rolodex_core::palette::CommandPalette;
use rolodex_core::recency::{FileStorage, RecencyStore};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod app;
mod cli;
mod colors;
mod keys;
mod render;
mod router;

use app::App;
use cli::{Cli, Commands};
use router::Router;

/// Set up logging with file output. TUI must log to file since it uses the terminal for display.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("rolodex-tui-{timestamp}.log");
    let log_path = log_dir.join(&log_filename);

    #[cfg(unix)]
    {
        let symlink_path = log_dir.join("rolodex-tui.log");
        let _ = std::fs::remove_file(&symlink_path);
        let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let dirs = Directories::new()?;
    let config_path = cli.config.clone().unwrap_or_else(|| dirs.config_file.clone());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(fixtures) = cli.fixtures {
        config.backend.fixtures = Some(fixtures);
    }
    info!("Loaded config from {}", config_path.display());

    match cli.command {
        Some(Commands::Query { query }) => search_query(&config, &query).await?,
        Some(Commands::Recent { clear }) => show_recent(&dirs, &config, clear),
        Some(Commands::Tui) | None => run_tui(&dirs, &config).await?,
    }

    Ok(())
}

fn open_backend(config: &Config) -> Result<Backend> {
    let backend = Backend::from_config(&config.backend, &config.search).context(
        "no record source: set backend.url in config.json or pass --fixtures <PATH>",
    )?;
    info!("Searching {}", backend.describe());
    Ok(backend)
}

async fn run_tui(dirs: &Directories, config: &Config) -> Result<()> {
    let backend = open_backend(config)?;
    let backend_label = backend.describe();

    let gateway = Arc::new(QueryGateway::from_config(backend, &config.search));
    let recency = RecencyStore::load(FileStorage::new(&dirs.recent_file), config.search.max_recent);
    let (palette, updates) = CommandPalette::new(gateway, config.search.debounce(), recency);
    let mut app = App::new(palette, Router::from_config(&config.app), backend_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, updates).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut updates: UnboundedReceiver<DispatchUpdate>,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| render::ui(f, app))?;
            needs_render = false;
        }

        tokio::select! {
            Some(update) = updates.recv() => {
                app.handle_update(update);
                needs_render = true;
            }

            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::error!("Event stream error: {}", e);
                        continue;
                    }
                };

                match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        tracing::debug!("KEY EVENT: code={:?}, modifiers={:?}", key.code, key.modifiers);
                        app.handle_input(keys::map_key(&key, app.palette.is_open()));
                    }
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                        app.handle_click(mouse.column, mouse.row);
                    }
                    Event::Resize(..) => {}
                    _ => continue,
                }
                needs_render = true;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn search_query(config: &Config, query: &str) -> Result<()> {
    if !meets_threshold(query, config.search.min_query_chars) {
        println!(
            "Type at least {} characters to search",
            config.search.min_query_chars
        );
        return Ok(());
    }

    let gateway = QueryGateway::from_config(open_backend(config)?, &config.search);
    println!("Searching: {query}");

    let results = gateway
        .search(query)
        .await
        .context("Couldn't complete search")?;

    if results.is_empty() {
        println!("No results for \"{query}\"");
        return Ok(());
    }

    for (category, records) in results.sections() {
        println!();
        println!("{} ({})", category.label(), records.len());
        for record in records {
            match &record.subtitle {
                Some(subtitle) => println!(
                    "  {} {} - {}  {}",
                    category.info().icon,
                    record.title,
                    subtitle,
                    record.target()
                ),
                None => println!(
                    "  {} {}  {}",
                    category.info().icon,
                    record.title,
                    record.target()
                ),
            }
        }
        println!(
            "  {}",
            rolodex_core::palette::view_all_link(category, query)
        );
    }
    println!();

    Ok(())
}

fn show_recent(dirs: &Directories, config: &Config, clear: bool) {
    let mut recency = RecencyStore::load(
        FileStorage::new(&dirs.recent_file),
        config.search.max_recent,
    );

    if clear {
        recency.clear();
        println!("Recent searches cleared");
        return;
    }

    if recency.list().is_empty() {
        println!("No recent searches");
        return;
    }

    println!();
    println!("Recent Searches");
    println!("===============");
    println!();
    for (i, entry) in recency.list().iter().enumerate() {
        println!("  {}. {entry}", i + 1);
    }
    println!();
}
