use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::engine::{OutputHandle, RodioEngine};
use crate::library::LibraryIndex;
use crate::session::PlaybackSession;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(msg) = config_warning {
        eprintln!("reelshelf: {msg}");
        warn!("{msg}");
    }

    let library = LibraryIndex::open(&settings.library)?;
    info!(
        dir = %library.dir().display(),
        entries = library.entries().len(),
        "library opened"
    );

    let output = OutputHandle::from_terminal();
    if !output.is_attached() {
        info!("no host window found, video output detached");
    }
    let engine = Arc::new(RodioEngine::new(settings.tools.ffmpeg.clone()));
    let mut session = PlaybackSession::new(
        engine,
        library.dir().to_path_buf(),
        output,
        Duration::from_millis(settings.playback.poll_interval_ms),
    );
    if let Err(e) = session.set_volume(settings.playback.initial_volume) {
        warn!("initial volume not applied: {e}");
    }
    let mut app = App::new(library, session, &settings.controls);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("exited");

    run_result
}
