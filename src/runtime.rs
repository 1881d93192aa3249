use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::timer::TICK_RATE_MS;

/// One step of the app loop: terminal input, or the tick that advances the
/// session clocks.
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Merges terminal input with the tick cadence the rest countdown depends on.
/// Input arrives over a channel and is drained ahead of ticks, but ticks are
/// produced against a deadline the pump keeps itself, so a burst of key
/// presses can delay a tick by at most one deadline, never drop it.
pub struct EventPump {
    input: Receiver<Event>,
    tick_every: Duration,
    next_tick: Instant,
}

impl EventPump {
    /// Pump fed by a crossterm read thread, ticking at the session clock rate.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || forward_terminal_input(tx));
        Self::over(rx, Duration::from_millis(TICK_RATE_MS))
    }

    /// Pump over an arbitrary input channel. Headless runs pass a zero
    /// interval to tick as fast as the loop polls.
    pub fn over(input: Receiver<Event>, tick_every: Duration) -> Self {
        Self {
            input,
            tick_every,
            next_tick: Instant::now() + tick_every,
        }
    }

    /// Blocks until the next input event or the tick deadline, whichever
    /// comes first. A closed input channel degrades to pure ticks.
    pub fn next(&mut self) -> Event {
        match self.input.try_recv() {
            Ok(ev) => return ev,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        }
        let now = Instant::now();
        if now >= self.next_tick {
            self.next_tick = now + self.tick_every;
            return Event::Tick;
        }
        match self.input.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.next_tick = Instant::now() + self.tick_every;
                Event::Tick
            }
        }
    }
}

fn forward_terminal_input(tx: Sender<Event>) {
    loop {
        let forwarded = match event::read() {
            Ok(CtEvent::Key(key)) => tx.send(Event::Key(key)),
            Ok(CtEvent::Resize(_, _)) => tx.send(Event::Resize),
            Ok(_) => continue,
            Err(_) => break,
        };
        if forwarded.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn queued_input_drains_before_any_tick() {
        let (tx, rx) = mpsc::channel();
        tx.send(Event::Key(KeyEvent::from(KeyCode::Char('s')))).unwrap();
        tx.send(Event::Resize).unwrap();
        let mut pump = EventPump::over(rx, Duration::from_millis(500));
        assert!(matches!(pump.next(), Event::Key(_)));
        assert!(matches!(pump.next(), Event::Resize));
    }

    #[test]
    fn closed_input_degrades_to_pure_ticks() {
        let (tx, rx) = mpsc::channel::<Event>();
        drop(tx);
        let mut pump = EventPump::over(rx, Duration::ZERO);
        for _ in 0..3 {
            assert!(matches!(pump.next(), Event::Tick));
        }
    }

    #[test]
    fn deadline_yields_a_tick_with_the_channel_open() {
        let (_tx, rx) = mpsc::channel::<Event>();
        let mut pump = EventPump::over(rx, Duration::from_millis(1));
        assert!(matches!(pump.next(), Event::Tick));
    }
}
