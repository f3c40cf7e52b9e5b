#![allow(dead_code)]

use chrono::{DateTime, Utc};
use siteplan::clock::FixedClock;
use siteplan::engine::Engine;
use siteplan::store::MemoryStore;
use siteplan::types::ScheduleId;

pub use siteplan_test_utils::builders::{SCHEDULE, StoreBuilder, TaskBuilder, rule};
pub use siteplan_test_utils::fakes::{FailingNotifier, RecordingNotifier};
pub use siteplan_test_utils::{date, init_tracing, noon};

/// Engine over `store` whose clock is frozen at `now`.
pub fn engine_at(store: &MemoryStore, now: DateTime<Utc>) -> Engine<MemoryStore> {
    init_tracing();
    Engine::new(store.clone()).with_clock(FixedClock(now))
}

pub fn schedule() -> ScheduleId {
    ScheduleId::new(SCHEDULE)
}
