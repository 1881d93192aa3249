use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use sloper::session::Phase;
use sloper::tracker::Snapshot;
use sloper::util::{format_mm_ss, format_rest};

use crate::{App, InputMode, Screen};

const HORIZONTAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(5),    // body
                Constraint::Length(1), // key help
            ])
            .split(area);

        render_header(self, chunks[0], buf);
        match self.screen {
            Screen::Session => render_session(self, chunks[1], buf),
            Screen::Drills => render_drills(self, chunks[1], buf),
        }
        render_help(self, chunks[2], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "sloper — bouldering sessions",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    title.render(cols[0], buf);

    // Passive readout only; sessions are fully usable offline.
    let status = if app.net.is_online() {
        Span::styled("● online", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ offline", Style::default().fg(Color::DarkGray))
    };
    Paragraph::new(status)
        .alignment(Alignment::Right)
        .render(cols[1], buf);
}

fn render_session(app: &App, area: Rect, buf: &mut Buffer) {
    let snap = app.tracker.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // session status
            Constraint::Length(4),  // touch log
            Constraint::Min(4),     // history
        ])
        .split(area);

    render_status(&snap, app, chunks[0], buf);
    render_touch_log(app, chunks[1], buf);
    render_history(app, chunks[2], buf);
}

fn render_status(snap: &Snapshot, app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = Vec::new();
    match snap.phase {
        Phase::Idle => {
            lines.push(Line::from(Span::styled("idle — press s to start", bold)));
            lines.push(Line::from(Span::styled(
                format!(
                    "target {} touches · rest {}",
                    snap.config.target_touches,
                    format_mm_ss(snap.config.rest_between_sets.max(0) as u64 * 1000)
                ),
                dim,
            )));
        }
        Phase::Active => {
            lines.push(Line::from(Span::styled(
                format!("climbing · {}", format_mm_ss(snap.elapsed.as_millis() as u64)),
                bold.fg(Color::Green),
            )));
            lines.push(Line::from(format!(
                "{} / {} touches · {} attempts",
                snap.total_touches, snap.config.target_touches, snap.attempts
            )));
            lines.push(Line::from(vec![
                Span::raw("touches this attempt: "),
                Span::styled(format!("{}▏", app.touch_input), bold),
                Span::styled("  (enter logs, blank = fall)", dim),
            ]));
        }
        Phase::Resting => {
            lines.push(Line::from(Span::styled(
                format!("resting · {}", format_rest(snap.rest_left_ms)),
                bold.fg(Color::Yellow),
            )));
            lines.push(Line::from(format!(
                "{} / {} touches · {} attempts",
                snap.total_touches, snap.config.target_touches, snap.attempts
            )));
            lines.push(Line::from(Span::styled("k skips the rest", dim)));
        }
        Phase::Complete => {
            lines.push(Line::from(Span::styled(
                "session complete!",
                bold.fg(Color::Cyan),
            )));
            lines.push(Line::from(format!(
                "{} · {} touches · {} attempts",
                format_mm_ss(snap.elapsed.as_millis() as u64),
                snap.total_touches,
                snap.attempts
            )));
            lines.push(Line::from(Span::styled("r starts over", dim)));
        }
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("session · {}", snap.phase)),
        )
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_touch_log(app: &App, area: Rect, buf: &mut Buffer) {
    let touches = app.tracker.touches();
    let line = if touches.is_empty() {
        Line::from(Span::styled(
            "no attempts yet",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        let spans: Vec<Span> = touches
            .iter()
            .map(|t| {
                if t.value == 0 {
                    Span::styled("· ", Style::default().fg(Color::Red))
                } else {
                    Span::styled(format!("{} ", t.value), Style::default().fg(Color::Green))
                }
            })
            .collect();
        Line::from(spans)
    };

    Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title("attempts"))
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    let now = Local::now();
    let lines: Vec<Line> = if app.tracker.history().is_empty() {
        vec![Line::from(Span::styled(
            "no sessions recorded yet",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        app.tracker
            .recent_history()
            .iter()
            .map(|s| {
                let age_secs = (now - s.end_time).num_seconds().max(0) as u64;
                let ago = HumanTime::from(std::time::Duration::from_secs(age_secs))
                    .to_text_en(Accuracy::Rough, Tense::Past);
                Line::from(format!(
                    "{} · {} touches · {} attempts · {}",
                    format_mm_ss(s.total_time_ms),
                    s.total_touches,
                    s.falls,
                    ago
                ))
            })
            .collect()
    };

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("history"))
        .render(area, buf);
}

fn render_drills(app: &App, area: Rect, buf: &mut Buffer) {
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = Vec::new();
    match app.input_mode {
        InputMode::DrillName => {
            lines.push(Line::from(vec![
                Span::raw("drill name: "),
                Span::styled(
                    format!("{}▏", app.drill_name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        InputMode::DrillDescription => {
            lines.push(Line::from(vec![
                Span::raw(format!("{} — description: ", app.drill_name)),
                Span::styled(
                    format!("{}▏", app.drill_desc),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        InputMode::Normal => {}
    }

    if app.drills.is_empty() {
        lines.push(Line::from(Span::styled(
            "no drills yet — press a to add your first one",
            dim,
        )));
    } else {
        for (idx, drill) in app.drills.drills().iter().enumerate() {
            let marker = if drill.completed { "[x]" } else { "[ ]" };
            let selected = idx == app.selected_drill && app.input_mode == InputMode::Normal;
            let style = match (selected, drill.completed) {
                (true, _) => Style::default().add_modifier(Modifier::REVERSED),
                (false, true) => dim,
                (false, false) => Style::default(),
            };
            let text = if drill.description.is_empty() {
                format!("{marker} {}", drill.name)
            } else {
                format!("{marker} {} — {}", drill.name, drill.description)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
    }

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("drills"))
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_help(app: &App, area: Rect, buf: &mut Buffer) {
    let help = match (app.screen, app.input_mode) {
        (Screen::Session, _) => {
            "s start · enter log · k skip rest · r reset · -/+ rest · [/] target · d drills · esc quit"
        }
        (Screen::Drills, InputMode::Normal) => {
            "a add · space toggle · x delete · ↑/↓ select · b back · esc quit"
        }
        (Screen::Drills, _) => "enter confirm · esc cancel",
    };
    Paragraph::new(Span::styled(
        help,
        Style::default().add_modifier(Modifier::DIM),
    ))
    .render(area, buf);
}
