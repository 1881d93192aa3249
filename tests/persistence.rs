use std::rc::Rc;

use sloper::config::{self, Config};
use sloper::drills::DrillLog;
use sloper::history;
use sloper::notify::CountingNotifier;
use sloper::storage::{KvStore, SqliteKvStore, CONFIG_KEY, SESSIONS_KEY};
use sloper::tracker::Tracker;
use tempfile::tempdir;

// Round-trips through the real SQLite backend, including process-restart
// simulation by reopening the same database file.

#[test]
fn config_roundtrips_through_sqlite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sloper.db");

    let store = SqliteKvStore::open(&path).unwrap();
    let cfg = Config {
        rest_between_sets: 90,
        target_touches: 25,
    };
    config::save(&store, &cfg).unwrap();
    drop(store);

    let store = SqliteKvStore::open(&path).unwrap();
    assert_eq!(config::load(&store), cfg);
}

#[test]
fn missing_database_rows_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let store = SqliteKvStore::open(dir.path().join("fresh.db")).unwrap();
    assert_eq!(config::load(&store), Config::default());
    assert!(history::load_all(&store).is_empty());
}

#[test]
fn corrupt_rows_fall_back_without_erroring() {
    let dir = tempdir().unwrap();
    let store = SqliteKvStore::open(dir.path().join("corrupt.db")).unwrap();
    store.set(CONFIG_KEY, "12").unwrap();
    store.set(SESSIONS_KEY, "{not a list}").unwrap();
    assert_eq!(config::load(&store), Config::default());
    assert!(history::load_all(&store).is_empty());
}

#[test]
fn completed_sessions_survive_restart_most_recent_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sloper.db");

    {
        let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::open(&path).unwrap());
        let mut tracker = Tracker::new(store, Rc::new(CountingNotifier::new()));
        tracker.update_config(sloper::config::ConfigUpdate {
            rest_between_sets: Some(0),
            target_touches: Some(2),
        });
        tracker.start_session();
        tracker.log_touch("2");
        tracker.reset_session();
        tracker.start_session();
        tracker.log_touch("5");
    }

    let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::open(&path).unwrap());
    let tracker = Tracker::new(store, Rc::new(CountingNotifier::new()));
    let history = tracker.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].total_touches, 5, "newest entry first");
    assert_eq!(history[1].total_touches, 2);
    assert_eq!(history[1].falls, 1);
}

#[test]
fn drills_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sloper.db");

    {
        let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::open(&path).unwrap());
        let mut drills = DrillLog::load(store);
        drills.add("campus ladders", "1-3-5, three sets");
        drills.add("silent feet", "");
        let id = drills.drills()[0].id.clone();
        drills.toggle(&id);
    }

    let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::open(&path).unwrap());
    let drills = DrillLog::load(store);
    assert_eq!(drills.len(), 2);
    assert_eq!(drills.drills()[0].name, "silent feet");
    assert!(drills.drills()[0].completed);
    assert!(!drills.drills()[1].completed);
}

#[test]
fn recorded_payload_keys_stay_stable() {
    // The stored key names and JSON field casing are the compatibility
    // surface with the original web app; pin them.
    let dir = tempdir().unwrap();
    let path = dir.path().join("sloper.db");

    let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::open(&path).unwrap());
    let mut tracker = Tracker::new(store.clone(), Rc::new(CountingNotifier::new()));
    tracker.update_config(sloper::config::ConfigUpdate {
        rest_between_sets: Some(0),
        target_touches: Some(1),
    });
    tracker.start_session();
    tracker.log_touch("1");

    let raw_sessions = store.get("sessions").expect("sessions key written");
    assert!(raw_sessions.contains("\"totalTouches\""));
    assert!(raw_sessions.contains("\"startTime\""));
    assert!(raw_sessions.contains("\"falls\""));

    let raw_config = store.get("config").expect("config key written");
    assert!(raw_config.contains("\"restBetweenSets\""));
    assert!(raw_config.contains("\"targetTouches\""));
}
