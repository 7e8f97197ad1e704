/// Sleep/wakeup between interrupt handlers and blocking callers.
///
/// The scheduler itself is not part of this crate; `Scheduler` is the seam.
/// A `WaitChannel` is a generation counter. A waiter samples it while holding
/// the lock that guards its predicate, drops the lock, then parks until the
/// counter moves. Notifiers bump the counter under that same lock, so a
/// wakeup landing between "drop lock" and "park" cannot be lost.
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
pub mod mock_sched;

/// Block/wake primitives and the termination flag of the calling context.
pub trait Scheduler: Sync {
    /// Whether the calling execution context has been marked for termination.
    fn killed(&self) -> bool;

    /// Suspend the caller until `seq` no longer reads `seen`.
    ///
    /// May return early; callers re-check their predicate in a loop.
    fn park(&self, seq: &AtomicU64, seen: u64);

    /// Wake every context parked on `seq`. Safe from interrupt context.
    fn unpark(&self, seq: &AtomicU64);

    /// Enter a section that interrupt handlers must not preempt. Nests.
    fn push_off(&self) {}

    /// Leave a section entered with `push_off`.
    fn pop_off(&self) {}
}

/// Generation counter that blocked readers park on.
pub struct WaitChannel {
    seq: AtomicU64,
}

impl WaitChannel {
    pub const fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
        }
    }

    /// Current generation. Sample it while holding the predicate's lock.
    pub fn generation(&self) -> u64 {
        self.seq.load(Ordering::Acquire)
    }

    /// Park until the generation moves past `seen`.
    pub fn wait(&self, seen: u64, sched: &dyn Scheduler) {
        if self.generation() == seen {
            sched.park(&self.seq, seen);
        }
    }

    /// Advance the generation and wake parked contexts.
    pub fn notify(&self, sched: &dyn Scheduler) {
        self.seq.fetch_add(1, Ordering::AcqRel);
        sched.unpark(&self.seq);
    }
}

/// Scoped `push_off` / `pop_off` pair.
///
/// Create it before taking a lock the interrupt path also takes, so the
/// lock guard is dropped first.
pub struct IrqOff<'a> {
    sched: &'a dyn Scheduler,
}

impl<'a> IrqOff<'a> {
    pub fn new(sched: &'a dyn Scheduler) -> Self {
        sched.push_off();
        Self { sched }
    }
}

impl Drop for IrqOff<'_> {
    fn drop(&mut self) {
        self.sched.pop_off();
    }
}
