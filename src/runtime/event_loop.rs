use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config;
use crate::engine::MediaEngine;
use crate::ui;

/// What the loop should do after a key was handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: draws the UI and dispatches keys to `app`.
/// Returns `Ok(())` when the user quits.
pub fn run<E: MediaEngine + 'static>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        // The poller updates the gauge in the background; redraw on a short tick.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Route one key press: an open modal swallows it, then prompts, then commands.
pub fn handle_key_event<E: MediaEngine + 'static>(key: KeyEvent, app: &mut App<E>) -> Flow {
    if app.modal.is_some() {
        app.close_modal();
        return Flow::Continue;
    }

    if app.mode != InputMode::Normal {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.submit_input(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Char(c) if !c.is_control() => app.push_input(c),
            _ => {}
        }
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('c') => app.clear_search(),
        KeyCode::Char('a') => app.begin_import(),
        KeyCode::Char('r') => app.rescan(),
        KeyCode::Char('p') => app.play(),
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Char('l') => app.next(),
        KeyCode::Char('h') => app.previous(),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('L') => app.nudge_seek(true),
        KeyCode::Char('H') => app.nudge_seek(false),
        KeyCode::Char(d @ '0'..='9') => {
            if let Some(tenth) = d.to_digit(10) {
                app.seek_to_percent((tenth * 10) as u8);
            }
        }
        KeyCode::Char('S') => app.snapshot(),
        KeyCode::Char('R') => app.toggle_recording(),
        _ => {}
    }

    Flow::Continue
}
