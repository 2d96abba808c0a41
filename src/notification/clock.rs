use chrono::{DateTime, Duration, Local};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for trigger computation.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Clock moved by hand. Share it through an `Rc` to keep a handle after
/// giving it to a scheduler.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_shared_through_rc() {
        let start = Local.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let clock = Rc::new(ManualClock::new(start));
        let handle = Rc::clone(&clock);

        handle.advance(Duration::hours(5));
        assert_eq!(clock.now(), start + Duration::hours(5));

        handle.set(start);
        assert_eq!(Clock::now(&clock), start);
    }
}
