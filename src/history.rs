use crate::session::SessionRecord;
use crate::storage::{KvStore, StorageError, SESSIONS_KEY};

/// How many sessions the UI surfaces; storage itself is unbounded.
pub const RECENT_LIMIT: usize = 10;

/// Returns all recorded sessions, most recent first. Missing or corrupt data
/// reads as an empty history.
pub fn load_all(store: &dyn KvStore) -> Vec<SessionRecord> {
    if let Some(raw) = store.get(SESSIONS_KEY) {
        if let Ok(sessions) = serde_json::from_str::<Vec<SessionRecord>>(&raw) {
            return sessions;
        }
    }
    Vec::new()
}

/// Persists the full ordered sequence. Append-only from the caller's point of
/// view: past entries are never edited or dropped.
pub fn save(store: &dyn KvStore, sessions: &[SessionRecord]) -> Result<(), StorageError> {
    let data = serde_json::to_string(sessions).unwrap_or_default();
    store.set(SESSIONS_KEY, &data)
}

/// The slice shown in the history panel.
pub fn recent(sessions: &[SessionRecord]) -> &[SessionRecord] {
    &sessions[..sessions.len().min(RECENT_LIMIT)]
}
