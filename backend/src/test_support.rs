//! Test utilities for the user service crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`),
//! which enable the `test-support` feature.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::UserIdGenerator;

/// Fixed timestamp used by fixtures across the test suites.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single() {
        Some(timestamp) => timestamp,
        None => panic!("fixture timestamp must be unambiguous"),
    }
}

/// Clock frozen at a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Create a clock reading `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `seconds` (backwards when negative).
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixture_timestamp())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Generator that always hands out the same identifier.
///
/// Drives the identifier collision path of user creation.
#[derive(Debug, Clone)]
pub struct FixedUserIdGenerator(pub UserId);

impl UserIdGenerator for FixedUserIdGenerator {
    fn next_id(&self) -> UserId {
        self.0.clone()
    }
}

/// Generator producing `00000000-0000-0000-0000-000000000001`, `...02`, and
/// so on, for predictable identifiers in assertions.
#[derive(Debug, Default)]
pub struct SequentialUserIdGenerator(AtomicU64);

impl UserIdGenerator for SequentialUserIdGenerator {
    fn next_id(&self) -> UserId {
        let next = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        UserId::from_uuid(Uuid::from_u128(u128::from(next)))
    }
}
