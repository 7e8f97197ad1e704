/// x86_64 architecture support.
///
/// This module provides:
/// - Port I/O (in/out instructions)
/// - Interrupt-flag control, including the nesting `push_off` / `pop_off`
///   pair used around locks shared with interrupt handlers
/// - Serial console (COM1), 8259 PIC, PIT tick, and the IDT
pub mod idt;
pub mod pic;
pub mod serial;
pub mod timer;

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// RFLAGS.IF
const RFLAGS_IF: u64 = 1 << 9;

/// Halt the CPU until the next interrupt.
#[inline(always)]
pub fn hlt() {
    unsafe { core::arch::asm!("hlt", options(nostack, nomem)); }
}

/// Disable interrupts.
#[inline(always)]
pub fn cli() {
    unsafe { core::arch::asm!("cli", options(nostack, nomem)); }
}

/// Enable interrupts.
#[inline(always)]
pub fn sti() {
    unsafe { core::arch::asm!("sti", options(nostack, nomem)); }
}

/// Enable interrupts and halt in one step. `sti` only takes effect after
/// the following instruction, so an interrupt cannot slip in between a
/// condition check done under `cli` and the `hlt`.
#[inline(always)]
pub fn sti_hlt() {
    unsafe { core::arch::asm!("sti", "hlt", options(nostack, nomem)); }
}

/// Whether maskable interrupts are currently enabled.
#[inline(always)]
pub fn interrupts_enabled() -> bool {
    let rflags: u64;
    unsafe {
        core::arch::asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
    }
    rflags & RFLAGS_IF != 0
}

/// Current code segment selector.
#[inline(always)]
pub fn read_cs() -> u16 {
    let cs: u16;
    unsafe {
        core::arch::asm!("mov {:x}, cs", out(reg) cs, options(nostack, nomem, preserves_flags));
    }
    cs
}

// ---- Nesting interrupt disable (single CPU) ----

static OFF_DEPTH: AtomicUsize = AtomicUsize::new(0);
static WERE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Disable interrupts, remembering whether they were on at the outermost level.
pub fn push_off() {
    let enabled = interrupts_enabled();
    cli();
    if OFF_DEPTH.fetch_add(1, Ordering::Relaxed) == 0 {
        WERE_ENABLED.store(enabled, Ordering::Relaxed);
    }
}

/// Undo one `push_off`; re-enables interrupts when the outermost one is
/// undone and they were on before it.
pub fn pop_off() {
    let depth = OFF_DEPTH.fetch_sub(1, Ordering::Relaxed);
    assert!(depth > 0, "pop_off without push_off");
    if depth == 1 && WERE_ENABLED.load(Ordering::Relaxed) {
        sti();
    }
}

/// Run `f` with interrupts disabled.
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    push_off();
    let r = f();
    pop_off();
    r
}

/// Write a byte to an I/O port.
#[inline(always)]
pub fn outb(port: u16, val: u8) {
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") val,
            options(nostack, preserves_flags),
        );
    }
}

/// Read a byte from an I/O port.
#[inline(always)]
pub fn inb(port: u16) -> u8 {
    let val: u8;
    unsafe {
        core::arch::asm!(
            "in al, dx",
            in("dx") port,
            out("al") val,
            options(nostack, preserves_flags),
        );
    }
    val
}
