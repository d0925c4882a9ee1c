use crate::models::{DataPoint, Snapshot};
use crate::storage::KeyValueStore;
use chrono::Duration;
use serde::Serialize;
use tracing::{debug, warn};

pub const GRAPH_DATA_KEY: &str = "graphData";

/// Lifetime of a series, and the max age of every write to its slot.
pub const EXPIRATION_WINDOW_MILLIS: i64 = 12 * 60 * 60 * 1000;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    data: &'a [DataPoint],
    expiration_time: i64,
}

/// Best-effort snapshot cache over a key/value slot.
///
/// The snapshot carries its own expiration instant so that it can be shown
/// to the user; the slot's native max age is never introspected.
#[derive(Debug)]
pub struct PersistenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn save(&mut self, series: &[DataPoint], expiration_time: i64) {
        let snapshot = SnapshotRef {
            data: series,
            expiration_time,
        };
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to encode snapshot: {err}");
                return;
            }
        };

        let max_age = Duration::milliseconds(EXPIRATION_WINDOW_MILLIS);
        match self.store.set(GRAPH_DATA_KEY, payload, max_age) {
            Ok(()) => debug!(points = series.len(), expiration_time, "snapshot saved"),
            Err(err) => warn!("snapshot not saved: {err}"),
        }
    }

    /// Returns the stored snapshot unless it is missing, unreadable or
    /// expired at `now_millis`. An expired snapshot is cleared.
    pub fn load(&mut self, now_millis: i64) -> Option<Snapshot> {
        let raw = self.store.get(GRAPH_DATA_KEY)?;
        let snapshot: Snapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("ignoring unreadable snapshot: {err}");
                return None;
            }
        };

        if now_millis > snapshot.expiration_time {
            debug!(
                expiration_time = snapshot.expiration_time,
                now_millis, "snapshot expired, clearing"
            );
            self.store.remove(GRAPH_DATA_KEY);
            return None;
        }

        Some(snapshot)
    }
}
