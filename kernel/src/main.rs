//! RecallOS kernel — entry point.
//!
//! Booted by the Limine bootloader, which sets up long mode, page tables
//! and a stack, then jumps to kmain. The kernel brings up the serial line
//! and interrupts, then hands COM1 to the line-editing console and runs
//! the shell on it.
#![no_std]
#![no_main]
#![feature(abi_x86_interrupt)]

use limine::BaseRevision;
use limine::request::{RequestsEndMarker, RequestsStartMarker};

use recallos_kernel::arch::x86_64::{self, pic, serial, timer};
use recallos_kernel::{platform, serial_println, shell};

use core::panic::PanicInfo;

// ---- Limine requests ----
// Must be #[used] and in .requests section for Limine to discover them.

#[used]
#[link_section = ".requests"]
static BASE_REVISION: BaseRevision = BaseRevision::new();

#[used]
#[link_section = ".requests_start_marker"]
static _START_MARKER: RequestsStartMarker = RequestsStartMarker::new();

#[used]
#[link_section = ".requests_end_marker"]
static _END_MARKER: RequestsEndMarker = RequestsEndMarker::new();

/// Kernel entry point, called by Limine.
#[no_mangle]
pub extern "C" fn kmain() -> ! {
    // 1. Serial first, so everything after can log
    serial::SERIAL.lock().init();
    serial_println!("RecallOS v0.1.0 — booting...");

    // 2. Verify Limine boot protocol
    assert!(BASE_REVISION.is_supported(), "Limine base revision not supported");
    serial_println!("[boot] Limine protocol OK");

    // 3. PIC, IDT and the PIT tick, all with interrupts still off
    unsafe { pic::init(); }
    serial_println!("[cpu] PIC remapped (IRQs masked)");
    unsafe { x86_64::idt::init(); }
    serial_println!("[cpu] IDT loaded");
    unsafe { timer::init(); }
    pic::unmask(pic::IRQ_TIMER);
    serial_println!("[cpu] PIT at {} Hz", timer::PIT_HZ);

    // 4. Console on COM1, then let input interrupts through
    let console = platform::init();
    serial::SERIAL.lock().enable_rx_interrupts();
    pic::unmask(pic::IRQ_COM1);
    x86_64::sti();

    serial_println!("RecallOS boot complete.");
    shell::run(console);
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("!!! KERNEL PANIC !!!");
    serial_println!("{}", info);
    loop {
        x86_64::hlt();
    }
}
