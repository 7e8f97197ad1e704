/// Spinning scheduler stand-in for host-target tests.
///
/// `park` busy-waits until the wait channel moves or the context is killed,
/// which is enough to drive a reader thread against a producer thread.
use core::sync::atomic::{AtomicBool, AtomicIsize, AtomicU64, AtomicUsize, Ordering};

use super::Scheduler;

pub struct MockScheduler {
    killed: AtomicBool,
    parks: AtomicUsize,
    unparks: AtomicUsize,
    irq_depth: AtomicIsize,
}

impl MockScheduler {
    pub const fn new() -> Self {
        Self {
            killed: AtomicBool::new(false),
            parks: AtomicUsize::new(0),
            unparks: AtomicUsize::new(0),
            irq_depth: AtomicIsize::new(0),
        }
    }

    /// Mark the calling context for termination.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::Release);
    }

    /// How many times a caller parked (for testing).
    pub fn parks(&self) -> usize {
        self.parks.load(Ordering::Acquire)
    }

    pub fn unparks(&self) -> usize {
        self.unparks.load(Ordering::Acquire)
    }

    /// Current push_off nesting. Zero whenever no console call is in flight.
    pub fn irq_depth(&self) -> isize {
        self.irq_depth.load(Ordering::Acquire)
    }
}

impl Scheduler for MockScheduler {
    fn killed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }

    fn park(&self, seq: &AtomicU64, seen: u64) {
        self.parks.fetch_add(1, Ordering::AcqRel);
        while seq.load(Ordering::Acquire) == seen && !self.killed() {
            core::hint::spin_loop();
        }
    }

    fn unpark(&self, _seq: &AtomicU64) {
        self.unparks.fetch_add(1, Ordering::AcqRel);
    }

    fn push_off(&self) {
        self.irq_depth.fetch_add(1, Ordering::AcqRel);
    }

    fn pop_off(&self) {
        self.irq_depth.fetch_sub(1, Ordering::AcqRel);
    }
}
