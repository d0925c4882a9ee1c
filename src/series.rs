use crate::clock::Clock;
use crate::models::DataPoint;
use crate::persistence::{EXPIRATION_WINDOW_MILLIS, PersistenceStore};
use crate::storage::KeyValueStore;
use chrono::SubsecRound;
use tracing::debug;

/// The current series and its expiration, bound to the store it is saved to.
///
/// Every mutation that leaves the series non-empty is written through to the
/// store before the mutating call returns.
#[derive(Debug)]
pub struct SeriesState<S, C> {
    points: Vec<DataPoint>,
    expiration_time: i64,
    persistence: PersistenceStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> SeriesState<S, C> {
    /// Restores the series from `store`, or starts a fresh expiration window
    /// when there is nothing usable to restore.
    pub fn initialize(store: S, clock: C) -> Self {
        let mut persistence = PersistenceStore::new(store);
        let now = clock.now_millis();

        match persistence.load(now) {
            Some(snapshot) => {
                debug!(points = snapshot.data.len(), "restoring series");
                let mut state = Self {
                    points: Vec::with_capacity(snapshot.data.len()),
                    expiration_time: snapshot.expiration_time,
                    persistence,
                    clock,
                };
                state.restore(snapshot.data);
                state
            }
            None => Self {
                points: Vec::new(),
                expiration_time: now + EXPIRATION_WINDOW_MILLIS,
                persistence,
                clock,
            },
        }
    }

    /// Appends a point stamped with the current time. The value is taken as
    /// given; rejecting invalid input is the caller's job.
    pub fn append(&mut self, value: f64) -> &DataPoint {
        let timestamp = self.clock.now().trunc_subsecs(3);
        self.points.push(DataPoint { value, timestamp });
        self.persist();
        &self.points[self.points.len() - 1]
    }

    /// Moves the start of a still-empty series to the window the viewer was
    /// shown. Ignored once the series has points, or when `expiration_time`
    /// lies outside `[now, now + window]`.
    pub fn adopt_expiration(&mut self, expiration_time: i64) -> bool {
        let now = self.clock.now_millis();
        let in_window = (now..=now + EXPIRATION_WINDOW_MILLIS).contains(&expiration_time);
        if !self.points.is_empty() || !in_window {
            return false;
        }
        self.expiration_time = expiration_time;
        true
    }

    /// Appends `points` in order, then saves once.
    pub fn restore(&mut self, points: impl IntoIterator<Item = DataPoint>) {
        self.points.extend(points);
        self.persist();
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn expiration_time(&self) -> i64 {
        self.expiration_time
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn into_store(self) -> S {
        self.persistence.into_inner()
    }

    fn persist(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.persistence.save(&self.points, self.expiration_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::Snapshot;
    use crate::persistence::GRAPH_DATA_KEY;
    use crate::stats::{count, deduction, net_value, total_sum};
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn seed(store: &mut MemoryStore, snapshot: &Snapshot) {
        store.insert_raw(GRAPH_DATA_KEY, serde_json::to_string(snapshot).unwrap());
    }

    fn stored_snapshot(store: &MemoryStore) -> Snapshot {
        serde_json::from_str(&store.get(GRAPH_DATA_KEY).unwrap()).unwrap()
    }

    #[test]
    fn fresh_start_from_empty_store() {
        let clock = ManualClock::new(start());
        let mut store = MemoryStore::new();
        let state = SeriesState::initialize(&mut store, &clock);

        assert_eq!(state.len(), 0);
        assert_eq!(
            state.expiration_time(),
            start().timestamp_millis() + 12 * 3_600_000
        );
        drop(state);
        assert!(!store.contains(GRAPH_DATA_KEY));
    }

    #[test]
    fn appending_updates_summary_and_store() {
        let clock = ManualClock::new(start());
        let mut store = MemoryStore::new();
        let mut state = SeriesState::initialize(&mut store, &clock);

        state.append(1.8);
        assert_eq!(count(state.points()), 1);
        assert!((total_sum(state.points()) - 1.8).abs() < 1e-9);
        assert!((net_value(state.points()) - 1.62).abs() < 1e-9);
        assert!((deduction(state.points()) - 0.18).abs() < 1e-9);

        clock.advance(Duration::seconds(30));
        state.append(2.2);
        assert!((total_sum(state.points()) - 4.0).abs() < 1e-9);
        assert!((net_value(state.points()) - 3.6).abs() < 1e-9);

        let expiration = state.expiration_time();
        drop(state);
        let saved = stored_snapshot(&store);
        assert_eq!(saved.expiration_time, expiration);
        assert_eq!(saved.data.len(), 2);
        assert_eq!(saved.data[0].value, 1.8);
        assert_eq!(saved.data[1].value, 2.2);
        assert_eq!(saved.data[1].timestamp, start() + Duration::seconds(30));
    }

    #[test]
    fn append_stamps_points_with_millisecond_precision() {
        let clock = ManualClock::new(start() + Duration::nanoseconds(123_456_789));
        let mut state = SeriesState::initialize(MemoryStore::new(), &clock);

        let point = state.append(7.0).clone();
        assert_eq!(point.timestamp, start() + Duration::milliseconds(123));
        assert_eq!(point.value, 7.0);
    }

    #[test]
    fn restores_unexpired_snapshot_in_order() {
        let clock = ManualClock::new(start());
        let now = start().timestamp_millis();
        let snapshot = Snapshot {
            data: vec![
                DataPoint {
                    value: 5.0,
                    timestamp: start() - Duration::minutes(2),
                },
                DataPoint {
                    value: 6.5,
                    timestamp: start() - Duration::minutes(1),
                },
            ],
            expiration_time: now + 1_000,
        };
        let mut store = MemoryStore::new();
        seed(&mut store, &snapshot);

        let state = SeriesState::initialize(&mut store, &clock);
        assert_eq!(state.points(), snapshot.data.as_slice());
        assert_eq!(state.expiration_time(), now + 1_000);
    }

    #[test]
    fn expiration_is_kept_across_reloads() {
        let clock = ManualClock::new(start());
        let mut store = MemoryStore::new();

        let mut state = SeriesState::initialize(&mut store, &clock);
        state.append(1.0);
        let expiration = state.expiration_time();
        drop(state);

        clock.advance(Duration::hours(3));
        let mut state = SeriesState::initialize(&mut store, &clock);
        assert_eq!(state.expiration_time(), expiration);
        state.append(2.0);
        assert_eq!(state.len(), 2);
        drop(state);

        assert_eq!(stored_snapshot(&store).expiration_time, expiration);
    }

    #[test]
    fn expired_snapshot_starts_a_new_window() {
        let clock = ManualClock::new(start());
        let mut store = MemoryStore::new();

        let mut state = SeriesState::initialize(&mut store, &clock);
        state.append(1.0);
        let first_expiration = state.expiration_time();
        drop(state);

        clock.advance(Duration::hours(12) + Duration::seconds(1));
        let state = SeriesState::initialize(&mut store, &clock);
        assert!(state.is_empty());
        assert_eq!(
            state.expiration_time(),
            clock.now_millis() + EXPIRATION_WINDOW_MILLIS
        );
        assert!(state.expiration_time() > first_expiration);
        drop(state);
        assert!(!store.contains(GRAPH_DATA_KEY));
    }

    #[test]
    fn unreadable_snapshot_starts_fresh() {
        let clock = ManualClock::new(start());
        let mut store = MemoryStore::new();
        store.insert_raw(GRAPH_DATA_KEY, "{broken");

        let state = SeriesState::initialize(&mut store, &clock);
        assert!(state.is_empty());
        assert_eq!(
            state.expiration_time(),
            start().timestamp_millis() + EXPIRATION_WINDOW_MILLIS
        );
    }

    #[test]
    fn restoring_refreshes_the_slot_max_age() {
        let clock = ManualClock::new(start());
        let snapshot = Snapshot {
            data: vec![DataPoint {
                value: 1.0,
                timestamp: start(),
            }],
            expiration_time: start().timestamp_millis() + 60_000,
        };
        let mut store = MemoryStore::new();
        seed(&mut store, &snapshot);
        assert_eq!(store.max_age(GRAPH_DATA_KEY), Some(Duration::zero()));

        let state = SeriesState::initialize(&mut store, &clock);
        drop(state);
        assert_eq!(store.max_age(GRAPH_DATA_KEY), Some(Duration::hours(12)));
        assert_eq!(stored_snapshot(&store), snapshot);
    }

    #[test]
    fn series_keeps_working_when_store_refuses_writes() {
        let clock = ManualClock::new(start());
        let mut state = SeriesState::initialize(MemoryStore::disabled(), &clock);

        state.append(4.0);
        state.append(1.0);
        assert_eq!(state.len(), 2);
        assert!((total_sum(state.points()) - 5.0).abs() < 1e-9);
        assert!(!state.into_store().contains(GRAPH_DATA_KEY));
    }

    #[test]
    fn empty_series_adopts_the_window_the_page_was_shown() {
        let clock = ManualClock::new(start());
        let shown = start().timestamp_millis() + EXPIRATION_WINDOW_MILLIS;
        clock.advance(Duration::minutes(20));

        let mut store = MemoryStore::new();
        let mut state = SeriesState::initialize(&mut store, &clock);
        assert!(state.adopt_expiration(shown));
        state.append(1.0);
        assert_eq!(state.expiration_time(), shown);
        drop(state);

        assert_eq!(stored_snapshot(&store).expiration_time, shown);
    }

    #[test]
    fn adopted_expiration_must_lie_within_one_window() {
        let clock = ManualClock::new(start());
        let now = start().timestamp_millis();
        let mut state = SeriesState::initialize(MemoryStore::new(), &clock);
        let fresh = state.expiration_time();

        assert!(!state.adopt_expiration(now - 1));
        assert!(!state.adopt_expiration(now + EXPIRATION_WINDOW_MILLIS + 1));
        assert_eq!(state.expiration_time(), fresh);
    }

    #[test]
    fn started_series_keeps_its_expiration() {
        let clock = ManualClock::new(start());
        let mut state = SeriesState::initialize(MemoryStore::new(), &clock);
        state.append(1.0);
        let expiration = state.expiration_time();

        assert!(!state.adopt_expiration(expiration - 60_000));
        assert_eq!(state.expiration_time(), expiration);
    }
}
