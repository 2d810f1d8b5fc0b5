use chrono::{DateTime, Local};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A reading of the clock: a monotonic instant for arithmetic and the
/// matching local wall-clock time for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub instant: Instant,
    pub wall: DateTime<Local>,
}

impl Stamp {
    pub fn new(instant: Instant, wall: DateTime<Local>) -> Self {
        Self { instant, wall }
    }

    /// Monotonic time elapsed since `earlier`, zero if `earlier` is later.
    pub fn duration_since(&self, earlier: &Stamp) -> Duration {
        self.instant.saturating_duration_since(earlier.instant)
    }
}

/// Source of "now" for the timer
pub trait Clock {
    fn now(&self) -> Stamp;
}

/// Production clock backed by `Instant::now` and `Local::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Stamp {
        Stamp::new(Instant::now(), Local::now())
    }
}

/// Clock that only moves when told to. Clones share the same time, so a test
/// can keep one handle and hand another to the timer.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base_instant: Instant,
    base_wall: DateTime<Local>,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(wall: DateTime<Local>) -> Self {
        Self {
            base_instant: Instant::now(),
            base_wall: wall,
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    pub fn advance_mins(&self, mins: u64) {
        self.advance(Duration::from_secs(mins * 60));
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Stamp {
        let offset = self.offset.get();
        let wall = chrono::Duration::from_std(offset)
            .ok()
            .and_then(|delta| self.base_wall.checked_add_signed(delta))
            .unwrap_or(self.base_wall);
        Stamp::new(self.base_instant + offset, wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_moves_both_readings() {
        let wall = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::starting_at(wall);
        let first = clock.now();

        clock.advance_mins(5);
        let second = clock.now();

        assert_eq!(second.duration_since(&first), Duration::from_secs(300));
        assert_eq!(second.wall - first.wall, chrono::Duration::minutes(5));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_secs(42);

        assert_eq!(clock.elapsed(), Duration::from_secs(42));
    }

    #[test]
    fn duration_since_saturates() {
        let clock = ManualClock::new();
        let early = clock.now();
        clock.advance_secs(10);
        let late = clock.now();

        assert_eq!(early.duration_since(&late), Duration::ZERO);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b.instant >= a.instant);
    }
}
