//! Wall-clock time sources for the real-time parts of the game.

use std::{cell::Cell, rc::Rc, time::SystemTime};

/// Source of wall-clock milliseconds.
///
/// Attack cooldowns and resting run on wall-clock time, everything else is
/// driven by the scheduler.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Operating system clock.
#[derive(Copy, Clone, Default, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time value, keep one outside the runtime to drive
/// it.
#[derive(Clone, Default, Debug)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        ManualClock(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shared_manual_clock() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(250);
        assert_eq!(clock.now_ms(), 350);
        handle.set(0);
        assert_eq!(clock.now_ms(), 0);
    }
}
