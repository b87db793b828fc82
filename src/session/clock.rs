//! Time source for the recorder

use std::time::Instant;

use chrono::{DateTime, Local};

/// Monotonic time for note offsets, wall time for file stamps.
pub trait Clock {
    fn now(&self) -> Instant;
    fn local_now(&self) -> DateTime<Local>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    base: Instant,
    local_base: DateTime<Local>,
    elapsed: std::rc::Rc<std::cell::Cell<std::time::Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        use chrono::TimeZone;
        Self {
            base: Instant::now(),
            local_base: Local
                .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
                .single()
                .unwrap_or_else(Local::now),
            elapsed: Default::default(),
        }
    }

    pub(crate) fn advance_secs(&self, secs: f64) {
        let elapsed = self.elapsed.get() + std::time::Duration::from_secs_f64(secs);
        self.elapsed.set(elapsed);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed.get()
    }

    fn local_now(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.elapsed.get())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.local_base + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.advance_secs(1.5);
        assert_eq!(clock.now() - start, std::time::Duration::from_millis(1500));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
