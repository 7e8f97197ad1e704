/// 8259 PIC (Programmable Interrupt Controller) — remap and selective unmask.
///
/// The legacy PIC maps IRQ 0-7 to interrupts 8-15, which collides with
/// CPU exceptions. We remap IRQs to 32-47 and leave everything masked;
/// drivers unmask the lines they service (PIT on IRQ0, COM1 on IRQ4).
use super::{inb, outb};

const PIC1_CMD: u16 = 0x20;
const PIC1_DATA: u16 = 0x21;
const PIC2_CMD: u16 = 0xA0;
const PIC2_DATA: u16 = 0xA1;

const ICW1_INIT: u8 = 0x11; // initialization + ICW4 needed
const ICW4_8086: u8 = 0x01; // 8086 mode

const EOI: u8 = 0x20;

/// First vector of the master PIC after remapping.
pub const IRQ_BASE: u8 = 32;

pub const IRQ_TIMER: u8 = 0;
pub const IRQ_COM1: u8 = 4;

/// Remap both PICs to `IRQ_BASE..IRQ_BASE + 16` with every line masked.
///
/// # Safety
/// Must be called during early boot, with interrupts disabled.
pub unsafe fn init() {
    outb(PIC1_CMD, ICW1_INIT);
    io_wait();
    outb(PIC2_CMD, ICW1_INIT);
    io_wait();

    outb(PIC1_DATA, IRQ_BASE); // IRQ 0-7  → INT 32-39
    io_wait();
    outb(PIC2_DATA, IRQ_BASE + 8); // IRQ 8-15 → INT 40-47
    io_wait();

    outb(PIC1_DATA, 4); // slave on IRQ2
    io_wait();
    outb(PIC2_DATA, 2); // cascade identity
    io_wait();

    outb(PIC1_DATA, ICW4_8086);
    io_wait();
    outb(PIC2_DATA, ICW4_8086);
    io_wait();

    outb(PIC1_DATA, 0xFF);
    outb(PIC2_DATA, 0xFF);
}

/// Let a master-PIC line (0-7) through.
pub fn unmask(irq: u8) {
    debug_assert!(irq < 8, "only master-PIC lines are used");
    let mask = inb(PIC1_DATA) & !(1 << irq);
    outb(PIC1_DATA, mask);
}

/// Acknowledge `irq` so the PIC delivers the next one.
pub fn send_eoi(irq: u8) {
    if irq >= 8 {
        outb(PIC2_CMD, EOI);
    }
    outb(PIC1_CMD, EOI);
}

/// Small I/O delay for PIC initialization.
fn io_wait() {
    // Writing to port 0x80 is a common way to add a small delay
    outb(0x80, 0);
}
