/// PIT tick: the uptime clock reported by `top`.
///
/// PIT channel 0 runs in rate-generator mode at `PIT_HZ` and raises IRQ0
/// on every period; the handler bumps `TICKS`. The shell's parked reader
/// also wakes on each tick, which bounds how long a missed wakeup could
/// ever stall it.
use core::sync::atomic::{AtomicU64, Ordering};
use super::outb;

/// Tick rate.
pub const PIT_HZ: u32 = 100;

/// PIT oscillator frequency: 1,193,182 Hz (standard PC).
const PIT_FREQ: u32 = 1_193_182;

const PIT_CH0_DATA: u16 = 0x40;
const PIT_CMD: u16 = 0x43;

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Program channel 0 for a periodic `PIT_HZ` interrupt.
///
/// # Safety
/// Must be called during boot, with interrupts disabled.
pub unsafe fn init() {
    let divisor = (PIT_FREQ / PIT_HZ) as u16;
    outb(PIT_CMD, 0x34); // channel 0, lobyte/hibyte, mode 2 (rate generator), binary
    outb(PIT_CH0_DATA, (divisor & 0xFF) as u8);
    outb(PIT_CH0_DATA, (divisor >> 8) as u8);
}

/// Called from the IRQ0 handler.
pub fn tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

pub fn uptime_secs() -> u64 {
    ticks() / PIT_HZ as u64
}
