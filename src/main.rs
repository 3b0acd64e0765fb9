mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::UiEvent;
use crate::state::refresher::PeriodicRefresher;
use ats_api::{EspnClient, OddsApiClient};
use atsbracket::roster::load_roster;
use atsbracket::{Bracket, PollSettings, Poller, PollerHandle, Settings, SpreadCache, SpreadResolver};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

enum CliMode {
    Tui,
    Print,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(mode) = handle_cli_args() else {
        return Ok(());
    };

    // Variables may come from the shell instead.
    let _ = dotenvy::dotenv();
    let settings = Settings::from_env()?;

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);

    let participants = load_roster(&settings.roster_path)?;
    let bracket = Arc::new(Mutex::new(Bracket::new(participants)?));
    let poller = build_poller(&settings, bracket.clone())?;

    match mode {
        CliMode::Print => print_bracket(poller, &bracket, &settings.backfill_dates).await,
        CliMode::Tui => run_tui(poller, bracket, settings.backfill_dates).await,
    }
}

fn handle_cli_args() -> Option<CliMode> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Some(CliMode::Tui);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            None
        }
        "-V" | "--version" => {
            println!("atsbracket {}", env!("CARGO_PKG_VERSION"));
            None
        }
        "-p" | "--print" => Some(CliMode::Print),
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "atsbracket - against-the-spread bracket tracker

Usage:
  atsbracket
  atsbracket --print
  atsbracket --help
  atsbracket --version

Environment (a .env file in the working directory is read first):
  ATS_ODDS_API_KEY         The Odds API key (required)
  ATS_ROSTER_JSON          Roster file (default ./roster.json)
  ATS_SPREAD_CACHE         Spread cache file, or \"off\" (default ./.spread_cache.json)
  ATS_POLL_INTERVAL_SECS   Seconds between scoreboard polls (default 60)
  ATS_BACKFILL_DATES       Scoreboard dates replayed at startup (default <year>03)
  ATS_LOG_LEVEL            error, warn, info, debug or trace (default info)"
}

fn build_poller(settings: &Settings, bracket: Arc<Mutex<Bracket>>) -> anyhow::Result<Poller> {
    let cache = match &settings.spread_cache_path {
        Some(path) => SpreadCache::load(path.clone())?,
        None => SpreadCache::disabled(),
    };
    let odds = Arc::new(OddsApiClient::new(settings.odds_api_key.clone()));
    let resolver = SpreadResolver::new(odds, cache);

    let poll_settings = PollSettings {
        interval_ticks: u32::try_from(settings.poll_interval.as_secs()).unwrap_or(u32::MAX),
        ..Default::default()
    };
    Ok(Poller::new(bracket, Arc::new(EspnClient::new()), resolver, poll_settings))
}

/// One-shot: backfill, then dump health and the bracket to stdout.
async fn print_bracket(
    poller: Poller,
    bracket: &Arc<Mutex<Bracket>>,
    backfill_dates: &str,
) -> anyhow::Result<()> {
    if let Err(e) = poller.backfill(backfill_dates).await {
        eprintln!("Backfill for {backfill_dates} failed: {e}");
    }

    let bracket = bracket.lock().await;
    println!("CURRENT STATE:\n{}", serde_json::to_string_pretty(&bracket.snapshot())?);
    println!("{}", bracket.render_text());
    Ok(())
}

async fn run_tui(
    poller: Poller,
    bracket: Arc<Mutex<Bracket>>,
    backfill_dates: String,
) -> anyhow::Result<()> {
    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(&*bracket.lock().await)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Redraw tick thread (every second)
    let periodic_refresher = PeriodicRefresher::new(ui_event_tx);
    let periodic_task = tokio::spawn(periodic_refresher.run());

    // Poller: backfill, then poll until the bracket is decided
    let poller = poller.start(Some(backfill_dates));

    main_ui_loop(terminal, app, bracket, ui_event_rx, &poller).await;

    input_handler.abort();
    periodic_task.abort();
    poller.stop().await;
    cleanup_terminal()?;

    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    bracket: Arc<Mutex<Bracket>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    poller: &PollerHandle,
) {
    redraw(&mut terminal, &app, &bracket).await;

    while let Some(ui_event) = ui_events.recv().await {
        let keep_running = match ui_event {
            UiEvent::KeyPressed(key_event) => keys::handle_key_bindings(key_event, &app).await,
            UiEvent::Resize => true,
            UiEvent::Refresh => {
                let healthy = bracket.lock().await.health().successfully_updating;
                app.lock().await.advance_spinner(poller.is_polling(), healthy);
                true
            }
        };
        if !keep_running {
            break;
        }
        redraw(&mut terminal, &app, &bracket).await;
    }
}

async fn redraw(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &Arc<Mutex<App>>,
    bracket: &Arc<Mutex<Bracket>>,
) {
    let app_guard = app.lock().await;
    let bracket_guard = bracket.lock().await;
    draw::draw(terminal, &app_guard, &bracket_guard);
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    // Short polls so the task notices the UI loop exiting.
    while !ui_events.is_closed() {
        match crossterm_event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => {
                tokio::task::yield_now().await;
                continue;
            }
            Err(_) => break,
        }

        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

fn cleanup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
