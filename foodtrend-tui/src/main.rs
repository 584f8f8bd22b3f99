//! FoodTrend TUI: interactive dashboard over the African food price tables.
//!
//! Reads the config, loads both CSV files once, then runs the
//! draw → poll → dispatch loop until `q`.

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use foodtrend_core::config::{DashboardConfig, LoggingConfig};
use foodtrend_core::loader::DatasetCache;
use foodtrend_tui::{handle_key, ui, AppState};

#[derive(Parser)]
#[command(name = "foodtrend-tui", about = "Terminal dashboard for African food prices")]
struct Args {
    /// Path to the TOML config
    #[arg(long, default_value = "foodtrend.toml")]
    config: PathBuf,

    /// Override the base table path (Bri1.csv)
    #[arg(long)]
    base: Option<PathBuf>,

    /// Override the extended table path (NewBri.csv)
    #[arg(long)]
    extended: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?
        .with_overrides(args.base, args.extended);

    init_logging(&config.logging)?;
    info!(config = %args.config.display(), "startup");

    // Load before touching the terminal so errors print normally.
    let cache = DatasetCache::new(config.dataset_paths());
    let dataset = cache.get_or_load().context("loading price tables")?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut app = AppState::new(dataset, config.analysis.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown");
    result
}

/// Logs go to a file; the alternate screen owns stdout.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)
        .with_context(|| format!("opening log file {}", logging.file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
