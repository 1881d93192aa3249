use std::time::{Duration, SystemTime};

/// Both clocks run off the app's single 100 ms tick source.
pub const TICK_RATE_MS: u64 = 100;

/// Count-up clock for session time. Always derived from the wall clock rather
/// than accumulated per tick, so missed or late ticks never skew the value.
#[derive(Debug, Clone, Copy)]
pub struct ElapsedClock {
    started_at: SystemTime,
}

impl ElapsedClock {
    pub fn new(started_at: SystemTime) -> Self {
        Self { started_at }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed().unwrap_or_default()
    }
}

/// Fixed-step rest countdown: exactly `TICK_RATE_MS` per tick, clamped at zero.
#[derive(Debug, Clone, Copy)]
pub struct RestClock {
    remaining_ms: u64,
}

impl RestClock {
    pub fn new(remaining_ms: u64) -> Self {
        Self { remaining_ms }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Advances one tick. Returns true once the countdown reaches zero; a
    /// clock armed with zero remaining expires on its first tick.
    pub fn tick(&mut self) -> bool {
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_RATE_MS);
        self.remaining_ms == 0
    }
}

/// Owns whichever clocks are currently armed. At most one instance of each
/// exists; arming replaces the previous instance and leaving the governing
/// state cancels it, so repeated start/rest cycles can never stack tick
/// sources.
#[derive(Debug, Default)]
pub struct TimerEngine {
    elapsed: Option<ElapsedClock>,
    rest: Option<RestClock>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_elapsed(&mut self, started_at: SystemTime) {
        self.cancel_elapsed();
        self.elapsed = Some(ElapsedClock::new(started_at));
    }

    pub fn cancel_elapsed(&mut self) {
        self.elapsed = None;
    }

    pub fn arm_rest(&mut self, remaining_ms: u64) {
        self.cancel_rest();
        self.rest = Some(RestClock::new(remaining_ms));
    }

    pub fn cancel_rest(&mut self) {
        self.rest = None;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.map(|c| c.elapsed())
    }

    pub fn rest_remaining_ms(&self) -> Option<u64> {
        self.rest.map(|c| c.remaining_ms())
    }

    pub fn has_elapsed_clock(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn has_rest_clock(&self) -> bool {
        self.rest.is_some()
    }

    /// Advances the rest clock one step if armed. On expiry the clock is torn
    /// down and true is returned exactly once.
    pub fn tick_rest(&mut self) -> bool {
        if let Some(rest) = self.rest.as_mut() {
            if rest.tick() {
                self.rest = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_clock_counts_down_in_fixed_steps() {
        let mut clock = RestClock::new(300);
        assert!(!clock.tick());
        assert_eq!(clock.remaining_ms(), 200);
        assert!(!clock.tick());
        assert_eq!(clock.remaining_ms(), 100);
        assert!(clock.tick());
        assert_eq!(clock.remaining_ms(), 0);
    }

    #[test]
    fn rest_clock_clamps_instead_of_underflowing() {
        let mut clock = RestClock::new(50);
        assert!(clock.tick());
        assert_eq!(clock.remaining_ms(), 0);
    }

    #[test]
    fn zero_length_rest_expires_on_first_tick() {
        let mut clock = RestClock::new(0);
        assert!(clock.tick());
    }

    #[test]
    fn engine_fires_expiry_exactly_once() {
        let mut engine = TimerEngine::new();
        engine.arm_rest(100);
        assert!(engine.tick_rest());
        assert!(!engine.tick_rest());
        assert!(!engine.has_rest_clock());
    }

    #[test]
    fn arming_replaces_previous_clock() {
        let mut engine = TimerEngine::new();
        engine.arm_rest(1_000);
        engine.arm_rest(200);
        assert_eq!(engine.rest_remaining_ms(), Some(200));

        engine.arm_elapsed(SystemTime::now());
        engine.arm_elapsed(SystemTime::now());
        assert!(engine.has_elapsed_clock());
    }

    #[test]
    fn elapsed_clock_is_wall_clock_derived() {
        let mut engine = TimerEngine::new();
        let start = SystemTime::now() - Duration::from_secs(5);
        engine.arm_elapsed(start);
        let elapsed = engine.elapsed().unwrap();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(6));
    }

    #[test]
    fn cancel_tears_clocks_down() {
        let mut engine = TimerEngine::new();
        engine.arm_elapsed(SystemTime::now());
        engine.arm_rest(500);
        engine.cancel_elapsed();
        engine.cancel_rest();
        assert!(engine.elapsed().is_none());
        assert!(!engine.tick_rest());
    }
}
