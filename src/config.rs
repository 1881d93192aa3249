use crate::storage::{KvStore, StorageError, CONFIG_KEY};
use serde::{Deserialize, Serialize};

/// Session tunables. Field names stay camelCase on disk for compatibility with
/// the web app's localStorage payloads.
///
/// The store deliberately performs no validation: any integers round-trip,
/// including zero or negative values. Clamping, where it happens at all, is a
/// UI-boundary concern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub rest_between_sets: i64,
    pub target_touches: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rest_between_sets: 180,
            target_touches: 100,
        }
    }
}

/// Partial update applied by `Tracker::update_config`; `None` fields are left
/// untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigUpdate {
    pub rest_between_sets: Option<i64>,
    pub target_touches: Option<i64>,
}

impl Config {
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(rest) = update.rest_between_sets {
            self.rest_between_sets = rest;
        }
        if let Some(target) = update.target_touches {
            self.target_touches = target;
        }
    }
}

/// Returns the persisted config, or the defaults when the key is missing or
/// the stored value does not parse.
pub fn load(store: &dyn KvStore) -> Config {
    if let Some(raw) = store.get(CONFIG_KEY) {
        if let Ok(cfg) = serde_json::from_str::<Config>(&raw) {
            return cfg;
        }
    }
    Config::default()
}

pub fn save(store: &dyn KvStore, cfg: &Config) -> Result<(), StorageError> {
    let data = serde_json::to_string(cfg).unwrap_or_default();
    store.set(CONFIG_KEY, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    #[test]
    fn roundtrip_default_config() {
        let store = MemoryKvStore::new();
        let cfg = Config::default();
        save(&store, &cfg).unwrap();
        assert_eq!(load(&store), cfg);
    }

    #[test]
    fn save_and_load_custom_config() {
        let store = MemoryKvStore::new();
        let cfg = Config {
            rest_between_sets: 45,
            target_touches: 12,
        };
        save(&store, &cfg).unwrap();
        assert_eq!(load(&store), cfg);
    }

    #[test]
    fn load_falls_back_to_default_on_missing_key() {
        let store = MemoryKvStore::new();
        assert_eq!(load(&store), Config::default());
    }

    #[test]
    fn load_falls_back_to_default_on_corrupt_value() {
        let store = MemoryKvStore::new();
        store.set(CONFIG_KEY, "not json").unwrap();
        assert_eq!(load(&store), Config::default());
    }

    #[test]
    fn store_accepts_unvalidated_integers() {
        let store = MemoryKvStore::new();
        let cfg = Config {
            rest_between_sets: -30,
            target_touches: 0,
        };
        save(&store, &cfg).unwrap();
        assert_eq!(load(&store), cfg);
    }

    #[test]
    fn disk_field_names_are_camel_case() {
        let raw = serde_json::to_string(&Config::default()).unwrap();
        assert!(raw.contains("restBetweenSets"));
        assert!(raw.contains("targetTouches"));
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let mut cfg = Config::default();
        cfg.apply(ConfigUpdate {
            rest_between_sets: Some(60),
            target_touches: None,
        });
        assert_eq!(cfg.rest_between_sets, 60);
        assert_eq!(cfg.target_touches, 100);
    }
}
