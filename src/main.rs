pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    rc::Rc,
};

use sloper::{
    app_dirs::AppDirs,
    config::ConfigUpdate,
    drills::DrillLog,
    network::NetWatcher,
    notify::TerminalBell,
    runtime::{Event, EventPump},
    session::Phase,
    storage::{KvStore, SqliteKvStore, StorageError},
    tracker::Tracker,
    util::format_mm_ss,
};

/// terminal bouldering session tracker
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Times bouldering sessions, enforces rest between attempts, logs touches per attempt, and keeps a local history that works fully offline."
)]
pub struct Cli {
    /// seconds of rest between attempts (persisted)
    #[clap(short = 'r', long)]
    rest_secs: Option<i64>,

    /// cumulative touch count that completes a session (persisted)
    #[clap(short = 't', long)]
    target_touches: Option<i64>,

    /// path to the storage database
    #[clap(long)]
    db: Option<PathBuf>,

    /// print recent session history and exit
    #[clap(long)]
    history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Session,
    Drills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    DrillName,
    DrillDescription,
}

pub struct App {
    pub tracker: Tracker,
    pub drills: DrillLog,
    pub net: NetWatcher,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub touch_input: String,
    pub drill_name: String,
    pub drill_desc: String,
    pub selected_drill: usize,
}

impl App {
    pub fn new(tracker: Tracker, drills: DrillLog, net: NetWatcher) -> Self {
        Self {
            tracker,
            drills,
            net,
            screen: Screen::Session,
            input_mode: InputMode::Normal,
            touch_input: String::new(),
            drill_name: String::new(),
            drill_desc: String::new(),
            selected_drill: 0,
        }
    }
}

fn open_store(path: Option<&Path>) -> Result<Rc<dyn KvStore>, StorageError> {
    if let Some(p) = path.map(Path::to_path_buf).or_else(AppDirs::db_path) {
        match SqliteKvStore::open(&p) {
            Ok(store) => return Ok(Rc::new(store)),
            Err(e) => warn!(
                "could not open {}: {e}; state will not survive exit",
                p.display()
            ),
        }
    }
    Ok(Rc::new(SqliteKvStore::open_in_memory()?))
}

fn print_history(tracker: &Tracker) {
    if tracker.history().is_empty() {
        println!("no sessions recorded yet");
        return;
    }
    for s in tracker.recent_history() {
        println!(
            "{}  {}  {} touches  {} attempts",
            s.end_time.format("%Y-%m-%d %H:%M"),
            format_mm_ss(s.total_time_ms),
            s.total_touches,
            s.falls,
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let store = open_store(cli.db.as_deref())?;
    let mut tracker = Tracker::new(store.clone(), Rc::new(TerminalBell));

    if cli.rest_secs.is_some() || cli.target_touches.is_some() {
        tracker.update_config(ConfigUpdate {
            rest_between_sets: cli.rest_secs,
            target_touches: cli.target_touches,
        });
    }

    if cli.history {
        print_history(&tracker);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let drills = DrillLog::load(store);
    let mut app = App::new(tracker, drills, NetWatcher::spawn());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn run_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut pump = EventPump::terminal();

    terminal.draw(|f| ui(app, f))?;

    loop {
        match pump.next() {
            Event::Tick => {
                let snap = app.tracker.on_tick();
                // Idle and complete screens are static between key presses.
                if matches!(snap.phase, Phase::Active | Phase::Resting) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            Event::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            Event::Key(key) => {
                if handle_key(app, key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match app.input_mode {
        InputMode::DrillName | InputMode::DrillDescription => handle_drill_entry(app, key),
        InputMode::Normal => match app.screen {
            Screen::Session => handle_session_key(app, key),
            Screen::Drills => handle_drills_key(app, key),
        },
    }
}

fn handle_session_key(app: &mut App, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('s') => {
            app.touch_input.clear();
            app.tracker.start_session();
        }
        KeyCode::Char('k') => {
            app.tracker.skip_rest();
        }
        KeyCode::Char('r') => {
            app.touch_input.clear();
            app.tracker.reset_session();
        }
        KeyCode::Char('d') => {
            app.screen = Screen::Drills;
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if app.tracker.snapshot().phase == Phase::Active {
                app.touch_input.push(c);
            }
        }
        KeyCode::Backspace => {
            app.touch_input.pop();
        }
        KeyCode::Enter => {
            if app.tracker.snapshot().phase == Phase::Active {
                let raw = std::mem::take(&mut app.touch_input);
                app.tracker.log_touch(&raw);
            }
        }
        // Settings adjustments clamp here at the UI boundary only; the store
        // itself accepts anything.
        KeyCode::Char('-') => {
            let rest = (app.tracker.config().rest_between_sets - 15).max(0);
            app.tracker.update_config(ConfigUpdate {
                rest_between_sets: Some(rest),
                target_touches: None,
            });
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let rest = app.tracker.config().rest_between_sets.max(0) + 15;
            app.tracker.update_config(ConfigUpdate {
                rest_between_sets: Some(rest),
                target_touches: None,
            });
        }
        KeyCode::Char('[') => {
            let target = (app.tracker.config().target_touches - 5).max(1);
            app.tracker.update_config(ConfigUpdate {
                rest_between_sets: None,
                target_touches: Some(target),
            });
        }
        KeyCode::Char(']') => {
            let target = app.tracker.config().target_touches.max(1) + 5;
            app.tracker.update_config(ConfigUpdate {
                rest_between_sets: None,
                target_touches: Some(target),
            });
        }
        _ => {}
    }
    Flow::Continue
}

fn handle_drills_key(app: &mut App, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('b') => {
            app.screen = Screen::Session;
        }
        KeyCode::Char('a') => {
            app.drill_name.clear();
            app.drill_desc.clear();
            app.input_mode = InputMode::DrillName;
        }
        KeyCode::Up => {
            app.selected_drill = app.selected_drill.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.selected_drill + 1 < app.drills.len() {
                app.selected_drill += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(drill) = app.drills.drills().get(app.selected_drill) {
                let id = drill.id.clone();
                app.drills.toggle(&id);
            }
        }
        KeyCode::Char('x') => {
            if let Some(drill) = app.drills.drills().get(app.selected_drill) {
                let id = drill.id.clone();
                app.drills.delete(&id);
                if app.selected_drill >= app.drills.len() {
                    app.selected_drill = app.drills.len().saturating_sub(1);
                }
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn handle_drill_entry(app: &mut App, key: KeyEvent) -> Flow {
    let buffer = match app.input_mode {
        InputMode::DrillName => &mut app.drill_name,
        _ => &mut app.drill_desc,
    };
    match key.code {
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Esc => {
            app.drill_name.clear();
            app.drill_desc.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.input_mode {
            InputMode::DrillName => {
                if !app.drill_name.trim().is_empty() {
                    app.input_mode = InputMode::DrillDescription;
                }
            }
            _ => {
                let name = std::mem::take(&mut app.drill_name);
                let desc = std::mem::take(&mut app.drill_desc);
                app.drills.add(&name, &desc);
                app.selected_drill = 0;
                app.input_mode = InputMode::Normal;
            }
        },
        _ => {}
    }
    Flow::Continue
}
