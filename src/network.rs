use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PROBE_ADDR: &str = "1.1.1.1:53";
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
const PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Passive reachability readout for the header. Purely informational: nothing
/// in the session machine reads it, and every feature works offline.
#[derive(Debug, Clone)]
pub struct NetWatcher {
    online: Arc<AtomicBool>,
}

impl NetWatcher {
    /// Starts the background probe thread. The readout stays pessimistic
    /// (offline) until the first probe succeeds.
    pub fn spawn() -> Self {
        let online = Arc::new(AtomicBool::new(false));
        let flag = online.clone();
        thread::spawn(move || loop {
            flag.store(probe(), Ordering::Relaxed);
            thread::sleep(PROBE_INTERVAL);
        });
        Self { online }
    }

    /// Fixed readout, for headless runs and tests.
    pub fn fixed(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

fn probe() -> bool {
    PROBE_ADDR
        .parse::<SocketAddr>()
        .ok()
        .map(|addr| TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_watcher_reports_given_state() {
        assert!(NetWatcher::fixed(true).is_online());
        assert!(!NetWatcher::fixed(false).is_online());
    }
}
