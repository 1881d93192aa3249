use std::cell::Cell;
use std::io::{self, Write};

/// Rest-finished notification seam. Failures are the caller's to swallow; a
/// notifier must never gate a state transition.
pub trait Notifier {
    fn rest_finished(&self) -> io::Result<()>;
}

/// Rings the terminal bell. Works inside the alternate screen and degrades to
/// nothing on terminals that ignore BEL.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn rest_finished(&self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// No-op notifier for headless runs (e.g. `--history`).
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn rest_finished(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Counts invocations; used by tests to assert when the notification fires.
#[derive(Debug, Default)]
pub struct CountingNotifier {
    count: Cell<usize>,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Notifier for CountingNotifier {
    fn rest_finished(&self) -> io::Result<()> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }
}

/// Always fails; lets tests prove a broken notifier never blocks transitions.
#[derive(Debug, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn rest_finished(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "no sound device"))
    }
}
