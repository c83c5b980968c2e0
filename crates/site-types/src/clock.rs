use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::TypeError;

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch.
    fn now_ms(&self) -> u64;

    /// The current UTC calendar day.
    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms() as i64)
            .map_or(NaiveDate::MIN, |dt| dt.date_naive())
    }
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A clock that only moves when told to. Used for tests and reproducible
/// fixtures.
#[derive(Debug, Default)]
pub struct FixedClock {
    ms: AtomicU64,
}

impl FixedClock {
    pub fn new(ms: u64) -> Self {
        Self {
            ms: AtomicU64::new(ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Monotonic, time-based identifier source.
///
/// Issues `max(wall_clock_ms, last + 1)`, so ids track submission time but
/// never repeat or go backwards, even when two ids are requested within
/// the same millisecond or the wall clock steps back.
pub struct IdClock {
    clock: Arc<dyn Clock>,
    last: Mutex<u64>,
}

impl IdClock {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: Mutex::new(0),
        }
    }

    /// An id clock over the system wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Record an id issued elsewhere (e.g. loaded from storage) so that
    /// later ids are strictly greater.
    pub fn observe(&self, id: u64) {
        let mut last = self.last.lock().expect("id clock mutex poisoned");
        if id > *last {
            *last = id;
        }
    }

    /// Issue the next id. Fails once `u64::MAX` has been issued or
    /// observed; the floor is left untouched.
    pub fn next_id(&self) -> Result<u64, TypeError> {
        let wall = self.clock.now_ms();
        let mut last = self.last.lock().expect("id clock mutex poisoned");
        let bumped = last
            .checked_add(1)
            .ok_or(TypeError::IdSpaceExhausted("inquiry"))?;
        let id = wall.max(bumped);
        *last = id;
        Ok(id)
    }

    /// The last id issued or observed.
    pub fn last_id(&self) -> u64 {
        *self.last.lock().expect("id clock mutex poisoned")
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl std::fmt::Debug for IdClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdClock")
            .field("last_id", &self.last_id())
            .finish()
    }
}
