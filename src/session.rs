use crate::config::Config;
use crate::timer::TimerEngine;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Lifecycle of one training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Active,
    Resting,
    Complete,
}

/// One logged attempt. `value` is the holds reached before falling or resting;
/// 0 is a fall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Touch {
    pub value: u32,
    pub timestamp: DateTime<Local>,
}

/// Immutable record of a completed session, as persisted in history.
///
/// `falls` counts every attempt, successful ones included. That is what the
/// original app stored under this name; readers of old payloads depend on it,
/// so the quirk is preserved rather than renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub total_time_ms: u64,
    pub touches: Vec<Touch>,
    pub total_touches: u64,
    pub falls: u64,
}

/// Touch input coercion rule (parse-or-zero): anything that is not a
/// non-negative integer counts as a fall. Logging never rejects input.
pub fn parse_or_zero(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|v| *v >= 0)
        .map(|v| v.min(u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Side effect requested by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEffect {
    None,
    /// The rest countdown ran out naturally; the caller should fire the
    /// notification. Never produced by `skip_rest`.
    RestFinished,
}

/// The session state machine. Owns the in-progress touch log and both clocks;
/// persistence and notification happen above it, after the mutation commits.
#[derive(Debug)]
pub struct SessionMachine {
    phase: Phase,
    timers: TimerEngine,
    started_wall: Option<SystemTime>,
    started_stamp: Option<DateTime<Local>>,
    touches: Vec<Touch>,
    total_touches: u64,
    elapsed: Duration,
    rest_left_ms: u64,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            timers: TimerEngine::new(),
            started_wall: None,
            started_stamp: None,
            touches: Vec::new(),
            total_touches: 0,
            elapsed: Duration::ZERO,
            rest_left_ms: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }

    /// Attempt count so far, including falls.
    pub fn attempts(&self) -> u64 {
        self.touches.len() as u64
    }

    /// Running sum of all logged touch values.
    pub fn total_touches(&self) -> u64 {
        self.total_touches
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn rest_left_ms(&self) -> u64 {
        self.rest_left_ms
    }

    #[cfg(test)]
    fn has_elapsed_clock(&self) -> bool {
        self.timers.has_elapsed_clock()
    }

    /// idle → active. Calling again while already active restarts the session:
    /// the previous elapsed clock is replaced, never duplicated. No-op in
    /// resting and complete.
    pub fn start(&mut self) {
        match self.phase() {
            Phase::Idle | Phase::Active => {
                let now = SystemTime::now();
                self.started_wall = Some(now);
                self.started_stamp = Some(Local::now());
                self.elapsed = Duration::ZERO;
                self.touches.clear();
                self.total_touches = 0;
                self.rest_left_ms = 0;
                self.timers.cancel_rest();
                self.timers.arm_elapsed(now);
                self.phase = Phase::Active;
            }
            Phase::Resting | Phase::Complete => {}
        }
    }

    /// active → resting | complete. The completion guard runs after the new
    /// touch is appended, so the completing touch is always part of the log.
    /// Returns the finished record when the target is reached. No-op outside
    /// active.
    pub fn log_touch(&mut self, raw: &str, cfg: &Config) -> Option<SessionRecord> {
        if self.phase() != Phase::Active {
            return None;
        }
        let value = parse_or_zero(raw);
        self.touches.push(Touch {
            value,
            timestamp: Local::now(),
        });
        self.total_touches += value as u64;

        if (self.total_touches as i64) >= cfg.target_touches {
            Some(self.complete())
        } else {
            // Elapsed clock governs only the active phase.
            self.timers.cancel_elapsed();
            let rest_ms = (cfg.rest_between_sets.max(0) as u64).saturating_mul(1000);
            self.rest_left_ms = rest_ms;
            self.timers.arm_rest(rest_ms);
            self.phase = Phase::Resting;
            None
        }
    }

    /// resting → active immediately, without the notification.
    pub fn skip_rest(&mut self) {
        if self.phase() != Phase::Resting {
            return;
        }
        self.rest_left_ms = 0;
        self.timers.cancel_rest();
        self.resume_active();
    }

    /// complete → idle. Discards transient state only; the recorded session
    /// already lives in history. Idempotent from idle and a no-op while a
    /// session is running.
    pub fn reset(&mut self) {
        if self.phase() != Phase::Complete {
            return;
        }
        self.timers.cancel_elapsed();
        self.timers.cancel_rest();
        self.started_wall = None;
        self.started_stamp = None;
        self.touches.clear();
        self.total_touches = 0;
        self.elapsed = Duration::ZERO;
        self.rest_left_ms = 0;
        self.phase = Phase::Idle;
    }

    /// Drives whichever clock governs the current phase.
    pub fn on_tick(&mut self) -> TickEffect {
        match self.phase() {
            Phase::Active => {
                if let Some(elapsed) = self.timers.elapsed() {
                    self.elapsed = elapsed;
                }
                TickEffect::None
            }
            Phase::Resting => {
                if self.timers.tick_rest() {
                    self.rest_left_ms = 0;
                    self.resume_active();
                    TickEffect::RestFinished
                } else {
                    self.rest_left_ms = self.timers.rest_remaining_ms().unwrap_or(0);
                    TickEffect::None
                }
            }
            Phase::Idle | Phase::Complete => TickEffect::None,
        }
    }

    fn resume_active(&mut self) {
        if let Some(started) = self.started_wall {
            self.timers.arm_elapsed(started);
        }
        self.phase = Phase::Active;
    }

    fn complete(&mut self) -> SessionRecord {
        self.timers.cancel_elapsed();
        self.timers.cancel_rest();

        let end_stamp = Local::now();
        let total = self
            .started_wall
            .and_then(|s| SystemTime::now().duration_since(s).ok())
            .unwrap_or_default();
        self.elapsed = total;
        self.rest_left_ms = 0;
        self.phase = Phase::Complete;

        SessionRecord {
            id: end_stamp.timestamp_millis().to_string(),
            start_time: self.started_stamp.unwrap_or(end_stamp),
            end_time: end_stamp,
            total_time_ms: total.as_millis() as u64,
            touches: self.touches.clone(),
            total_touches: self.total_touches,
            falls: self.touches.len() as u64,
        }
    }
}
