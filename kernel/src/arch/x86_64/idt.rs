/// Interrupt Descriptor Table (IDT).
///
/// Fatal CPU exceptions are reported on the serial log and halt the CPU:
/// - #DE (0)  Division by zero
/// - #UD (6)  Invalid opcode
/// - #DF (8)  Double fault
/// - #GP (13) General protection fault
/// - #PF (14) Page fault
///
/// PIC lines (remapped to 32-47): IRQ0 drives the uptime tick, IRQ4 feeds
/// COM1 input to the console. The rest get a stub that only acknowledges.
use super::{pic, timer};

/// IDT entry (16 bytes on x86_64).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct IdtEntry {
    offset_low: u16,
    selector: u16,
    ist: u8,
    type_attr: u8,
    offset_mid: u16,
    offset_high: u32,
    _reserved: u32,
}

impl IdtEntry {
    pub const fn missing() -> Self {
        Self {
            offset_low: 0,
            selector: 0,
            ist: 0,
            type_attr: 0, // NOT present
            offset_mid: 0,
            offset_high: 0,
            _reserved: 0,
        }
    }

    /// Present interrupt gate (DPL=0) in code segment `selector`.
    pub fn interrupt_gate(handler: u64, selector: u16) -> Self {
        Self {
            offset_low: handler as u16,
            selector,
            ist: 0,
            type_attr: 0x8E, // present | interrupt gate | DPL=0
            offset_mid: (handler >> 16) as u16,
            offset_high: (handler >> 32) as u32,
            _reserved: 0,
        }
    }
}

/// The IDT — 256 entries.
#[repr(C, align(16))]
pub struct Idt {
    pub entries: [IdtEntry; 256],
}

impl Idt {
    pub const fn new() -> Self {
        Self {
            entries: [IdtEntry::missing(); 256],
        }
    }

    /// Load this IDT into the CPU via LIDT.
    pub fn load(&'static self) {
        let ptr = IdtPointer {
            limit: (core::mem::size_of::<Self>() - 1) as u16,
            base: self as *const _ as u64,
        };

        unsafe {
            core::arch::asm!("lidt [{}]", in(reg) &ptr, options(nostack));
        }
    }
}

#[repr(C, packed)]
struct IdtPointer {
    limit: u16,
    base: u64,
}

static IDT: spin::Once<Idt> = spin::Once::new();

/// Build the IDT and load it.
///
/// The bootloader's GDT stays in place, so every gate uses whatever code
/// segment we are running in now.
///
/// # Safety
/// Called once during boot, with interrupts disabled.
pub unsafe fn init() {
    let idt = IDT.call_once(|| {
        let cs = super::read_cs();
        let gate = |handler: u64| IdtEntry::interrupt_gate(handler, cs);
        let mut idt = Idt::new();

        idt.entries[0] = gate(isr_de as *const () as u64);
        idt.entries[6] = gate(isr_ud as *const () as u64);
        idt.entries[8] = gate(isr_df as *const () as u64);
        idt.entries[13] = gate(isr_gp as *const () as u64);
        idt.entries[14] = gate(isr_pf as *const () as u64);

        let base = pic::IRQ_BASE as usize;
        for i in base..base + 16 {
            idt.entries[i] = gate(isr_irq_stub as *const () as u64);
        }
        idt.entries[base + pic::IRQ_TIMER as usize] = gate(isr_timer as *const () as u64);
        idt.entries[base + pic::IRQ_COM1 as usize] = gate(isr_com1 as *const () as u64);

        idt
    });

    idt.load();
}

/// Interrupt stack frame pushed by the CPU before our handler runs.
#[repr(C)]
pub struct InterruptFrame {
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}

// ---- Exception handlers ----

extern "x86-interrupt" fn isr_de(frame: InterruptFrame) {
    exception_handler("Division by zero (#DE)", &frame, None);
}

extern "x86-interrupt" fn isr_ud(frame: InterruptFrame) {
    exception_handler("Invalid opcode (#UD)", &frame, None);
}

extern "x86-interrupt" fn isr_df(frame: InterruptFrame, error_code: u64) -> ! {
    exception_handler("Double fault (#DF)", &frame, Some(error_code));
}

extern "x86-interrupt" fn isr_gp(frame: InterruptFrame, error_code: u64) {
    exception_handler("General protection fault (#GP)", &frame, Some(error_code));
}

extern "x86-interrupt" fn isr_pf(frame: InterruptFrame, error_code: u64) {
    let cr2: u64;
    unsafe { core::arch::asm!("mov {}, cr2", out(reg) cr2, options(nostack, nomem)); }
    crate::serial_println!("[int] page fault at {:#x}", cr2);
    exception_handler("Page fault (#PF)", &frame, Some(error_code));
}

// ---- Hardware interrupts ----

extern "x86-interrupt" fn isr_timer(_frame: InterruptFrame) {
    timer::tick();
    pic::send_eoi(pic::IRQ_TIMER);
}

extern "x86-interrupt" fn isr_com1(_frame: InterruptFrame) {
    crate::platform::com1_interrupt();
    pic::send_eoi(pic::IRQ_COM1);
}

extern "x86-interrupt" fn isr_irq_stub(_frame: InterruptFrame) {
    // Masked lines should never fire; ack both PICs in case one does.
    pic::send_eoi(8);
}

fn exception_handler(name: &str, frame: &InterruptFrame, error_code: Option<u64>) -> ! {
    crate::serial_println!("!!! CPU EXCEPTION: {} !!!", name);
    if let Some(code) = error_code {
        crate::serial_println!("  Error code: {:#x}", code);
    }
    crate::serial_println!("  RIP:     {:#x}", frame.rip);
    crate::serial_println!("  CS:      {:#x}", frame.cs);
    crate::serial_println!("  RFLAGS:  {:#x}", frame.rflags);
    crate::serial_println!("  RSP:     {:#x}", frame.rsp);
    loop { super::hlt(); }
}
