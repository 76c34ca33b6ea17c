mod tui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use depth_ladder::config::{AppConfig, FeedKind, LogConfig};
use depth_ladder::{BinanceRest, DepthSource, SimulatedBook};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{fs::OpenOptions, io, time::Duration};
use tui::app::App;

fn main() -> Result<()> {
    let offline = std::env::args().skip(1).any(|arg| arg == "--offline");

    let config_path = AppConfig::default_path();
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if offline {
        config.feed.source = FeedKind::Simulated;
    }

    init_logging(&config.log)?;
    info!(
        "Starting with {:?} source, pair {}, refresh every {}ms",
        config.feed.source, config.ladder.default_pair, config.feed.refresh_interval_ms
    );

    let source: Box<dyn DepthSource> = match config.feed.source {
        FeedKind::Binance => Box::new(BinanceRest::new(
            config.feed.endpoint.clone(),
            config.feed.depth_limit,
        )),
        FeedKind::Simulated => Box::new(SimulatedBook::new(config.feed.depth_limit as usize)),
    };
    let mut app = App::new(&config, source);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!(
        "Exiting after {} ticks ({} failed)",
        app.total_ticks, app.failed_ticks
    );
    Ok(())
}

/// The terminal belongs to the UI, so logs only go somewhere when a file is configured.
fn init_logging(log: &LogConfig) -> Result<()> {
    let Some(path) = &log.file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(log.level_filter()?)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| tui::ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
