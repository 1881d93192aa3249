use crate::storage::{KvStore, DRILLS_KEY};
use chrono::{DateTime, Local};
use log::warn;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One checklist entry. Shape and key names match the original web app's
/// localStorage payload (`bouldering-drills`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Local>,
    pub completed: bool,
}

/// Drill checklist, newest first, persisted after every mutation. Writes are
/// best-effort; the in-memory list stays authoritative for this process.
pub struct DrillLog {
    store: Rc<dyn KvStore>,
    drills: Vec<Drill>,
}

impl DrillLog {
    pub fn load(store: Rc<dyn KvStore>) -> Self {
        let drills = store
            .get(DRILLS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { store, drills }
    }

    pub fn drills(&self) -> &[Drill] {
        &self.drills
    }

    pub fn is_empty(&self) -> bool {
        self.drills.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drills.len()
    }

    /// Prepends a new drill. A blank name is rejected, matching the web form's
    /// required field; the description is optional.
    pub fn add(&mut self, name: &str, description: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let now = Local::now();
        // Epoch-millis ids like the web app, bumped past any collision so two
        // adds in the same millisecond stay addressable.
        let mut id = now.timestamp_millis();
        while self.drills.iter().any(|d| d.id == id.to_string()) {
            id += 1;
        }
        self.drills.insert(
            0,
            Drill {
                id: id.to_string(),
                name: name.to_string(),
                description: description.trim().to_string(),
                date: now,
                completed: false,
            },
        );
        self.persist();
        true
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(drill) = self.drills.iter_mut().find(|d| d.id == id) {
            drill.completed = !drill.completed;
            self.persist();
        }
    }

    pub fn delete(&mut self, id: &str) {
        let before = self.drills.len();
        self.drills.retain(|d| d.id != id);
        if self.drills.len() != before {
            self.persist();
        }
    }

    fn persist(&self) {
        let data = serde_json::to_string(&self.drills).unwrap_or_default();
        if let Err(e) = self.store.set(DRILLS_KEY, &data) {
            warn!("failed to persist drills: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn log() -> (DrillLog, Rc<MemoryKvStore>) {
        let store = Rc::new(MemoryKvStore::new());
        (DrillLog::load(store.clone()), store)
    }

    #[test]
    fn add_prepends_and_persists() {
        let (mut drills, store) = log();
        assert!(drills.add("4x4s", "four problems, four rounds"));
        assert!(drills.add("silent feet", ""));
        assert_eq!(drills.len(), 2);
        assert_eq!(drills.drills()[0].name, "silent feet");
        assert!(store.get(DRILLS_KEY).unwrap().contains("4x4s"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let (mut drills, store) = log();
        assert!(!drills.add("   ", "whatever"));
        assert!(drills.is_empty());
        assert_eq!(store.get(DRILLS_KEY), None);
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let (mut drills, _) = log();
        drills.add("a", "");
        drills.add("b", "");
        let id = drills.drills()[1].id.clone();
        drills.toggle(&id);
        assert!(drills.drills()[1].completed);
        assert!(!drills.drills()[0].completed);
        drills.toggle(&id);
        assert!(!drills.drills()[1].completed);
    }

    #[test]
    fn delete_removes_and_survives_reload() {
        let store = Rc::new(MemoryKvStore::new());
        let mut drills = DrillLog::load(store.clone());
        drills.add("keep", "");
        drills.add("drop", "");
        let id = drills.drills()[0].id.clone();
        drills.delete(&id);

        let reloaded = DrillLog::load(store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.drills()[0].name, "keep");
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let store = Rc::new(MemoryKvStore::new());
        store.set(DRILLS_KEY, "[{]").unwrap();
        assert!(DrillLog::load(store).is_empty());
    }
}
