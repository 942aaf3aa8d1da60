//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode, ModalKind};
use crate::config::{ControlsSettings, UiSettings};
use crate::engine::MediaEngine;
use crate::session::SessionPhase;

/// Render the key help text, incorporating the seek step.
fn controls_text(seek_step_percent: u8) -> String {
    [
        "[j/k] up/down".to_string(),
        "[enter] select".to_string(),
        "[p] play".to_string(),
        "[space] pause".to_string(),
        "[x] stop".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{seek_step_percent}%"),
        "[0-9] seek to 0-90%".to_string(),
        "[m] mute".to_string(),
        "[+/-] volume".to_string(),
        "[/] search".to_string(),
        "[c] clear search".to_string(),
        "[a] add video".to_string(),
        "[r] rescan".to_string(),
        "[S] snapshot".to_string(),
        "[R] record".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn ms_to_duration(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

fn phase_text(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Idle => "Idle",
        SessionPhase::Ready => "Ready",
        SessionPhase::Playing => "Playing",
        SessionPhase::Paused => "Paused",
        SessionPhase::Stopped => "Stopped",
        SessionPhase::Ended => "Ended",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Window of `total` rows of height `height` that keeps `selected` centered
/// when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// One transport button: label, dimmed when the control is disabled.
fn button(label: &str, enabled: bool) -> Span<'_> {
    let style = if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Span::styled(format!("[{label}]"), style)
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<E: MediaEngine + 'static>(
    frame: &mut Frame,
    app: &App<E>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" reelshelf ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Search / add prompt
    let (prompt_title, prompt_text) = match app.mode {
        InputMode::Search => (" search (enter to run, esc to cancel) ", format!("{}_", app.input)),
        InputMode::Import => (" add video: path (enter to add, esc to cancel) ", format!("{}_", app.input)),
        InputMode::Normal => (" search ", app.library.query().unwrap_or_default().to_string()),
    };
    let prompt = Paragraph::new(prompt_text).block(left_padded(prompt_title));
    frame.render_widget(prompt, chunks[1]);

    // Library list
    {
        let visible = app.library.visible();
        let current = app.session.current_path();
        let (start, end, selected_in_window) =
            visible_window(visible.len(), chunks[2].height.saturating_sub(2) as usize, app.selected);

        let items: Vec<ListItem> = visible[start..end]
            .iter()
            .map(|entry| {
                if current == Some(entry.path.as_path()) {
                    ListItem::new(format!("♪ {}", entry.name)).style(Style::default().fg(Color::Cyan))
                } else {
                    ListItem::new(format!("  {}", entry.name))
                }
            })
            .collect();

        let title = format!(" {} ({}) ", app.library.dir().display(), visible.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !visible.is_empty() {
            state.select(Some(selected_in_window));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Now playing
    let session = &app.session;
    let status = {
        let mut parts: Vec<String> = vec![phase_text(session.phase()).to_string()];
        if let Some(name) = session
            .current_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            parts.push(format!("Video: {name}"));
        }
        parts.push(format!("Volume: {}", session.volume()));
        if session.is_muted() {
            parts.push("MUTED".to_string());
        }
        if let Some(dest) = session.record_path().filter(|_| session.is_recording()) {
            parts.push(format!("REC → {}", dest.display()));
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(left_padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[3]);

    // Progress
    let percent = session.progress().lock().map(|p| p.percent()).unwrap_or(0);
    let engine = session.engine();
    let label = format!(
        "{} / {}",
        format_mmss(ms_to_duration(engine.time_ms())),
        format_mmss(ms_to_duration(engine.length_ms()))
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(percent))
        .label(label);
    frame.render_widget(gauge, chunks[4]);

    // Transport bar
    let c = session.controls();
    let buttons = [
        button("Play", c.play),
        button(c.pause_label.as_str(), c.pause),
        button("Stop", c.stop),
        button("Previous", c.previous),
        button("Next", c.next),
        button(c.mute_label.as_str(), true),
        button("Snapshot", c.snapshot),
        button(c.record_label.as_str(), c.record),
    ];
    let mut spans: Vec<Span> = Vec::new();
    for b in buttons {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(b);
    }
    let transport = Paragraph::new(Line::from(spans)).block(left_padded(" controls "));
    frame.render_widget(transport, chunks[5]);

    let footer = Paragraph::new(controls_text(controls_settings.seek_step_percent))
        .block(left_padded(" keys "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);

    // Message box over everything else
    if let Some(modal) = &app.modal {
        let popup_area = centered_rect_sized(72, 8, frame.area());
        frame.render_widget(Clear, popup_area);

        let color = match modal.kind {
            ModalKind::Info => Color::Green,
            ModalKind::Warning => Color::Yellow,
            ModalKind::Error => Color::Red,
        };
        let popup = Paragraph::new(modal.text.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} (any key closes) ", modal.title))
                    .border_style(Style::default().fg(color))
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    }),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_selection_centered() {
        assert_eq!(visible_window(3, 10, 2), (0, 3, 2));
        assert_eq!(visible_window(20, 5, 10), (8, 13, 2));
        assert_eq!(visible_window(20, 5, 19), (15, 20, 4));
    }

    #[test]
    fn negative_times_render_as_zero() {
        assert_eq!(format_mmss(ms_to_duration(-1)), "00:00");
        assert_eq!(format_mmss(ms_to_duration(61_500)), "01:01");
    }

    #[test]
    fn popup_fits_inside_small_areas() {
        let r = Rect::new(0, 0, 20, 6);
        let popup = centered_rect_sized(72, 8, r);
        assert!(popup.width <= 18 && popup.height <= 5);
    }
}
