//! Ticker TUI Entry Point
//!
//! Runs the slide-in/slide-out ticker in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Built-in demo items
//! ticker-tui
//!
//! # Your own items, dismissed by click or space
//! ticker-tui --item "Hello" --item "World" --mode click
//!
//! # Linear slides
//! ticker-tui --easing linear
//!
//! # With config file and debug logs
//! ticker-tui --config ./ticker.toml --log-file /tmp/ticker.log --log-level debug
//! ```

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ticker_core::{
    default_config_path, load_config_from_path, ConfigOverrides, InteractionMode, TickerConfig,
    TickerToml,
};
use ticker_tui::stage::{EasingFunction, CONTAINER_SELECTOR};
use ticker_tui::App;

/// Ticker TUI - rotating text with slide transitions
#[derive(Parser, Debug)]
#[command(name = "ticker-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "TICKER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Item to rotate through (repeatable, replaces configured items)
    #[arg(short = 'i', long = "item", value_name = "TEXT")]
    items: Vec<String>,

    /// Pause between phases and slide length, in milliseconds
    #[arg(short = 'd', long, value_name = "N")]
    duration_ms: Option<u64>,

    /// Offset a new item waits at before sliding in, in pixels
    #[arg(short = 'o', long, value_name = "N", allow_hyphen_values = true)]
    offset_px: Option<i32>,

    /// Dismissal mode (auto, click)
    #[arg(short = 'm', long)]
    mode: Option<InteractionMode>,

    /// Slide easing (linear, ease-in, ease-out, ease-in-out)
    #[arg(short = 'e', long, default_value_t = EasingFunction::default())]
    easing: EasingFunction,

    /// Pixels of offset per terminal row
    #[arg(long, value_name = "N", default_value_t = 10)]
    px_per_row: u16,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long, env = "TICKER_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "TICKER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if !self.items.is_empty() {
            overrides = overrides.with_items(self.items.clone());
        }
        if let Some(ms) = self.duration_ms {
            overrides = overrides.with_transition_duration_ms(ms);
        }
        if let Some(px) = self.offset_px {
            overrides = overrides.with_start_offset_px(px);
        }
        if let Some(mode) = self.mode {
            overrides = overrides.with_interaction_mode(mode);
        }
        overrides
    }
}

/// Lowest-priority layer so the binary runs with no configuration at all
fn demo_layer() -> TickerToml {
    TickerToml {
        items: Some(vec![
            "Rotating text, one line at a time".to_string(),
            "Each item slides in from below".to_string(),
            "and slides out the top".to_string(),
            "Press q to quit".to_string(),
        ]),
        container_selector: Some(CONTAINER_SELECTOR.to_string()),
        transition_duration_ms: Some(2000),
        start_offset_px: Some(30),
        interaction_mode: Some(InteractionMode::Auto),
    }
}

fn load_config(args: &Args) -> Result<TickerConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let loaded = load_config_from_path(path, &demo_layer(), &args.overrides())
        .context("Invalid ticker configuration")?;

    tracing::info!(
        source = %loaded.source,
        file = ?loaded.config_file_path,
        items = loaded.config.items.len(),
        mode = %loaded.config.interaction_mode,
        "Configuration resolved"
    );
    Ok(loaded.config)
}

/// Log to a file if asked; stdout belongs to the alternate screen
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("Invalid log level")?;

    let file_layer = match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ticker-tui requires a terminal (TTY)");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, args.easing, args.px_per_row).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: TickerConfig,
    easing: EasingFunction,
    px_per_row: u16,
) -> Result<()> {
    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let mut app =
        App::new(config, easing, px_per_row, area).context("Failed to start ticker")?;
    app.run(terminal).await
}
