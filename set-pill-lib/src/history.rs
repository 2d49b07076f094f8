// set-pill-lib/src/history.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::{DbError, KeyValueStore};

/// Storage key under which the whole history payload lives.
pub const HISTORY_KEY: &str = "WorkoutHistory";
/// Number of workouts retained; older entries are evicted first.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSet {
    pub set_number: usize,
    pub weight: String,
    pub reps: String,
    pub elapsed_time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHistoryEntry {
    pub date: DateTime<Utc>,
    pub exercise_name: String,
    pub sets: Vec<CompletedSet>,
}

/// What the flow controller needs from persisted history. Neither call
/// reports failure: a broken store behaves like an empty one.
pub trait HistoryStore {
    fn save(&mut self, entry: WorkoutHistoryEntry);
    /// Sets of the most recent entry whose exercise name matches exactly,
    /// or an empty list.
    fn load_previous(&self, exercise_name: &str) -> Vec<CompletedSet>;
}

/// Bounded workout history encoded as one JSON array (oldest first).
#[derive(Debug)]
pub struct WorkoutHistory<S> {
    store: S,
}

impl<S: KeyValueStore> WorkoutHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All retained entries, oldest first. Unreadable or malformed payloads
    /// yield an empty list.
    pub fn entries(&self) -> Vec<WorkoutHistoryEntry> {
        match self.store.read(HISTORY_KEY) {
            Ok(Some(payload)) => decode(&payload),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "history unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Appends `entry`, dropping the oldest entries beyond `HISTORY_CAPACITY`.
    /// # Errors
    /// Returns `DbError` if the payload cannot be written.
    pub fn try_save(&mut self, entry: WorkoutHistoryEntry) -> Result<(), DbError> {
        let mut entries = self.entries();
        entries.push(entry);
        if entries.len() > HISTORY_CAPACITY {
            let excess = entries.len() - HISTORY_CAPACITY;
            entries.drain(..excess);
        }
        let payload = serde_json::to_string(&entries)?;
        self.store.write(HISTORY_KEY, &payload)
    }

    /// # Errors
    /// Returns `DbError` if the stored payload cannot be removed.
    pub fn clear(&mut self) -> Result<(), DbError> {
        self.store.remove(HISTORY_KEY)
    }
}

impl<S: KeyValueStore> HistoryStore for WorkoutHistory<S> {
    fn save(&mut self, entry: WorkoutHistoryEntry) {
        let exercise = entry.exercise_name.clone();
        let set_count = entry.sets.len();
        match self.try_save(entry) {
            Ok(()) => info!(%exercise, set_count, "saved workout to history"),
            Err(e) => warn!(error = %e, %exercise, "failed to save workout history"),
        }
    }

    fn load_previous(&self, exercise_name: &str) -> Vec<CompletedSet> {
        self.entries()
            .into_iter()
            .rev()
            .find(|e| e.exercise_name == exercise_name)
            .map(|e| e.sets)
            .unwrap_or_default()
    }
}

fn decode(payload: &str) -> Vec<WorkoutHistoryEntry> {
    serde_json::from_str(payload).unwrap_or_else(|e| {
        warn!(error = %e, "history payload is malformed, treating as empty");
        Vec::new()
    })
}
