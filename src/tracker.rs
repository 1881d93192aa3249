use crate::config::{self, Config, ConfigUpdate};
use crate::history;
use crate::notify::Notifier;
use crate::session::{Phase, SessionMachine, SessionRecord, TickEffect, Touch};
use crate::storage::KvStore;
use log::warn;
use std::rc::Rc;
use std::time::Duration;

/// Observable state returned by every user action and by the tick handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub elapsed: Duration,
    pub rest_left_ms: u64,
    pub total_touches: u64,
    pub attempts: u64,
    pub config: Config,
}

/// The state container: owns the session machine, config, and loaded history,
/// and invokes persistence and notification as side effects after each
/// committed mutation. Storage and the notifier are injected so headless runs
/// and tests swap them freely.
pub struct Tracker {
    store: Rc<dyn KvStore>,
    notifier: Rc<dyn Notifier>,
    config: Config,
    machine: SessionMachine,
    history: Vec<SessionRecord>,
}

impl Tracker {
    /// Loads config and history once; both fall back (defaults / empty) when
    /// the store has nothing usable.
    pub fn new(store: Rc<dyn KvStore>, notifier: Rc<dyn Notifier>) -> Self {
        let config = config::load(store.as_ref());
        let history = history::load_all(store.as_ref());
        Self {
            store,
            notifier,
            config,
            machine: SessionMachine::new(),
            history,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.history
    }

    pub fn recent_history(&self) -> &[SessionRecord] {
        history::recent(&self.history)
    }

    pub fn touches(&self) -> &[Touch] {
        self.machine.touches()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.machine.phase(),
            elapsed: self.machine.elapsed(),
            rest_left_ms: self.machine.rest_left_ms(),
            total_touches: self.machine.total_touches(),
            attempts: self.machine.attempts(),
            config: self.config,
        }
    }

    pub fn start_session(&mut self) -> Snapshot {
        self.machine.start();
        self.snapshot()
    }

    /// Logs one attempt; on completion the finished session is prepended to
    /// history and the full sequence persisted. A failed write leaves the
    /// in-memory history authoritative.
    pub fn log_touch(&mut self, raw: &str) -> Snapshot {
        if let Some(mut record) = self.machine.log_touch(raw, &self.config) {
            // Epoch-millis ids collide when two sessions finish in the same
            // millisecond; bump past the log like the drill ids do.
            if let Ok(mut id) = record.id.parse::<i64>() {
                while self.history.iter().any(|r| r.id == id.to_string()) {
                    id += 1;
                }
                record.id = id.to_string();
            }
            self.history.insert(0, record);
            if let Err(e) = history::save(self.store.as_ref(), &self.history) {
                warn!("failed to persist session history: {e}");
            }
        }
        self.snapshot()
    }

    pub fn skip_rest(&mut self) -> Snapshot {
        self.machine.skip_rest();
        self.snapshot()
    }

    pub fn reset_session(&mut self) -> Snapshot {
        self.machine.reset();
        self.snapshot()
    }

    /// Applies a partial config change and persists unconditionally. No
    /// validation here; see the UI boundary for advisory clamping.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Snapshot {
        self.config.apply(update);
        if let Err(e) = config::save(self.store.as_ref(), &self.config) {
            warn!("failed to persist config: {e}");
        }
        self.snapshot()
    }

    /// Advances the clocks one tick. A naturally expired rest fires the
    /// notification; notifier errors are logged and swallowed so the
    /// transition already committed by the machine stands.
    pub fn on_tick(&mut self) -> Snapshot {
        if self.machine.on_tick() == TickEffect::RestFinished {
            if let Err(e) = self.notifier.rest_finished() {
                warn!("rest notification failed: {e}");
            }
        }
        self.snapshot()
    }
}
