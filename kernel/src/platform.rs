/// Bare-metal wiring for the console: COM1 as the terminal, a halt-based
/// scheduler for the single kernel shell, and a fixed process table.
///
/// There is one CPU and one blocking reader (the shell), so parking means
/// halting until the next interrupt and re-checking the wait channel.
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::arch::x86_64::{self, serial::SERIAL, timer};
use crate::console::{ConsoleContext, TerminalDevice};
use crate::proc::{ProcInfo, ProcSnapshot, ProcState, ProcessTable};
use crate::sync::Scheduler;

/// COM1 as the console terminal.
pub struct Com1Terminal;

impl TerminalDevice for Com1Terminal {
    fn put_byte(&self, byte: u8) {
        x86_64::without_interrupts(|| SERIAL.lock().put_byte(byte));
    }

    fn get_byte_blocking(&self) -> u8 {
        // Only reached from the IRQ4 handler, where interrupts are already off.
        SERIAL.lock().read_byte()
    }
}

/// Set while the shell is halted waiting for input.
static SHELL_PARKED: AtomicBool = AtomicBool::new(false);

/// Single-CPU scheduler: parking halts until an interrupt moves the channel.
pub struct HaltScheduler;

impl Scheduler for HaltScheduler {
    fn killed(&self) -> bool {
        // The kernel shell cannot be killed.
        false
    }

    fn park(&self, seq: &AtomicU64, seen: u64) {
        SHELL_PARKED.store(true, Ordering::Relaxed);
        loop {
            x86_64::cli();
            if seq.load(Ordering::Acquire) != seen {
                x86_64::sti();
                break;
            }
            // Wakes on the next IRQ: COM1 input or the PIT tick.
            x86_64::sti_hlt();
        }
        SHELL_PARKED.store(false, Ordering::Relaxed);
    }

    fn unpark(&self, _seq: &AtomicU64) {
        // The parked loop re-checks the channel after every interrupt.
    }

    fn push_off(&self) {
        x86_64::push_off();
    }

    fn pop_off(&self) {
        x86_64::pop_off();
    }
}

/// The tasks this kernel actually runs.
pub struct KernelTasks;

impl ProcessTable for KernelTasks {
    fn snapshot(&self) -> ProcSnapshot {
        let mut snap = ProcSnapshot::empty();
        snap.uptime_secs = timer::uptime_secs();
        let shell = if SHELL_PARKED.load(Ordering::Relaxed) {
            ProcState::Sleeping
        } else {
            ProcState::Running
        };
        snap.push(ProcInfo::new(1, "kshell", 0, shell));
        snap
    }
}

static TERMINAL: Com1Terminal = Com1Terminal;
static SCHEDULER: HaltScheduler = HaltScheduler;
static TASKS: KernelTasks = KernelTasks;

static CONSOLE: spin::Once<ConsoleContext<'static>> = spin::Once::new();

/// Build the global console. Call before enabling COM1 receive interrupts.
pub fn init() -> &'static ConsoleContext<'static> {
    let console = CONSOLE.call_once(|| ConsoleContext::new(&TERMINAL, &SCHEDULER, &TASKS));
    crate::serial_println!("[console] ready on COM1");
    console
}

/// IRQ4: hand every byte waiting in the UART to the console.
pub fn com1_interrupt() {
    let Some(console) = CONSOLE.get() else {
        // Not wired yet: drain so the line deasserts.
        while SERIAL.lock().try_read_byte().is_some() {}
        return;
    };
    loop {
        // The port lock must be released before the console echoes.
        let byte = SERIAL.lock().try_read_byte();
        match byte {
            Some(b) => console.interrupt(b),
            None => break,
        }
    }
}
