// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod drills;
pub mod history;
pub mod network;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod timer;
pub mod tracker;
pub mod util;
