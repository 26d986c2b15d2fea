mod input;
mod ui;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use input::{handle_key, handle_mouse, InputResult, Overlay, PointerTracker};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ui::viewport::Viewport;
use unlocktree::achievements::persistence::data_dir;
use unlocktree::achievements::{built_in_achievements, load_feed, JsonFileStore, KeyValueStore};
use unlocktree::app::App;
use unlocktree::build_info;
use unlocktree::constants::{FRAME_POLL_MS, LOG_FILE_NAME};

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut data_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Unlocktree - Terminal Achievement Tree\n");
                println!("Usage: unlocktree [options]\n");
                println!("Options:");
                println!("  --data <file>  Load achievements from a JSON file");
                println!("  --version      Show version information");
                println!("  --help         Show this help message");
                std::process::exit(0);
            }
            "--data" => {
                i += 1;
                match args.get(i) {
                    Some(path) => data_file = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--data needs a file path");
                        std::process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'unlocktree --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    init_logging();

    let defs = match data_file {
        Some(path) => match load_feed(&path) {
            Ok(defs) => defs,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => built_in_achievements(),
    };
    let mut app = match App::new(defs, JsonFileStore::open_default()?) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Invalid achievement data: {}", e);
            std::process::exit(1);
        }
    };

    let mut viewport = Viewport::default();
    viewport.recenter(app.view().bounds());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut viewport);

    // Cleanup terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(level = app.level(), "exiting");
    result
}

fn run<K: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<K>,
    viewport: &mut Viewport,
) -> io::Result<()> {
    let mut overlay = Overlay::None;
    let mut pointer = PointerTracker::default();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw_ui(frame, app, viewport, &overlay))?;

        if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(key, app, viewport, &mut overlay) == InputResult::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app, viewport, &mut pointer, overlay),
                _ => {}
            }
        }

        // Advance animations by real elapsed time
        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;
    }
}

/// Sends tracing output to a log file in the data directory; the terminal
/// belongs to the UI. Logging stays off if the file cannot be opened.
fn init_logging() {
    let Ok(dir) = data_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
    else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unlocktree=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
}
